//! Built-in skill tables. Hand-curated; edit here or ship a JSON taxonomy via `TAXONOMY_PATH`.
//!
//! Canonical names must already be in normalized form (lowercase, single spaces,
//! no punctuation other than `.`, `+`, `#`). `Taxonomy::from_definition` rejects
//! anything else at startup.

use crate::taxonomy::{RelatedEntry, SynonymEntry, TaxonomyDefinition};

/// Canonical skill → surface forms. Order matters: a form claimed twice resolves
/// to the entry registered last.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    // Languages
    ("python", &["python", "py", "python3"]),
    ("javascript", &["javascript", "js", "ecmascript"]),
    ("typescript", &["typescript", "ts"]),
    ("java", &["java"]),
    ("c++", &["c++", "cpp"]),
    ("c#", &["c#", "csharp"]),
    ("golang", &["golang", "go lang"]),
    ("rust", &["rust", "rustlang"]),
    ("ruby", &["ruby"]),
    ("php", &["php"]),
    ("kotlin", &["kotlin"]),
    ("swift", &["swift"]),
    ("scala", &["scala"]),
    ("sql", &["sql"]),
    ("bash", &["bash", "shell scripting"]),
    // Web
    ("html", &["html", "html5"]),
    ("css", &["css", "css3"]),
    ("sass", &["sass", "scss"]),
    ("bootstrap", &["bootstrap"]),
    ("tailwind", &["tailwindcss", "tailwind", "tailwind css"]),
    ("react", &["react", "react.js", "reactjs"]),
    ("angular", &["angular", "angularjs"]),
    ("vue", &["vue", "vue.js", "vuejs"]),
    ("next.js", &["next.js", "nextjs"]),
    ("node.js", &["node.js", "nodejs", "node"]),
    ("express.js", &["express.js", "expressjs"]),
    ("rest api", &["rest api", "restful api", "rest apis", "restful apis", "restful"]),
    ("graphql", &["graphql"]),
    ("api", &["api", "apis"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("fastapi", &["fastapi", "fast api"]),
    ("spring boot", &["spring boot", "springboot"]),
    // Data stores
    ("mysql", &["mysql"]),
    ("postgresql", &["postgresql", "postgres"]),
    ("mongodb", &["mongodb", "mongo"]),
    ("redis", &["redis"]),
    ("firebase", &["firebase"]),
    ("elasticsearch", &["elasticsearch", "elastic search"]),
    ("nosql", &["nosql"]),
    ("relational database", &["relational database", "relational databases", "rdbms"]),
    // Cloud and ops
    ("aws", &["aws", "amazon web services"]),
    ("azure", &["azure", "microsoft azure"]),
    ("gcp", &["gcp", "google cloud", "google cloud platform"]),
    ("docker", &["docker"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("terraform", &["terraform"]),
    ("jenkins", &["jenkins"]),
    ("cicd", &["ci/cd", "cicd", "continuous integration", "continuous deployment", "continuous delivery"]),
    ("git", &["git", "github", "gitlab"]),
    ("jira", &["jira"]),
    ("linux", &["linux"]),
    ("unix", &["unix"]),
    ("kafka", &["kafka", "apache kafka"]),
    ("spark", &["spark", "apache spark", "pyspark"]),
    ("microservices", &["microservices", "microservice", "micro services"]),
    // ML and data
    ("machine learning", &["machine learning", "ml"]),
    ("deep learning", &["deep learning", "dl"]),
    ("natural language processing", &["nlp", "natural language processing"]),
    ("computer vision", &["computer vision"]),
    ("neural networks", &["neural networks", "neural network"]),
    ("tensorflow", &["tensorflow", "tf"]),
    ("pytorch", &["pytorch"]),
    ("keras", &["keras"]),
    ("transformers", &["transformers"]),
    ("bert", &["bert"]),
    ("lstm", &["lstm"]),
    ("rnn", &["rnn", "rnns", "recurrent neural networks"]),
    ("hugging face", &["hugging face", "huggingface"]),
    ("scikit learn", &["scikit-learn", "scikit learn", "sklearn"]),
    ("pandas", &["pandas"]),
    ("numpy", &["numpy"]),
    ("matplotlib", &["matplotlib"]),
    ("seaborn", &["seaborn"]),
    ("data analysis", &["data analysis", "data analytics"]),
    ("data visualization", &["data visualization", "visualization", "data visualisation"]),
    ("google colab", &["google colab", "colab"]),
    ("jupyter", &["jupyter", "jupyter notebook", "jupyter notebooks"]),
    ("tableau", &["tableau"]),
    ("power bi", &["power bi", "powerbi"]),
    ("excel", &["excel", "microsoft excel", "ms excel"]),
];

/// Skill → skills it implies. Targets are canonicalized when the graph is built,
/// so unknown targets survive as title-cased names.
pub const RELATED: &[(&str, &[&str])] = &[
    ("deep learning", &["transformers", "bert", "lstm", "rnn", "neural networks", "sequence models"]),
    ("transformers", &["bert", "hugging face", "sequence models"]),
    ("bert", &["transformers"]),
    ("lstm", &["rnn", "sequence models", "deep learning"]),
    ("rnn", &["lstm", "sequence models", "deep learning"]),
    ("machine learning", &["supervised learning", "unsupervised learning", "classification", "regression"]),
    ("natural language processing", &["text mining", "tokenization", "named entity recognition"]),
    ("spacy", &["natural language processing", "named entity recognition"]),
    ("tensorflow", &["deep learning", "keras"]),
    ("pytorch", &["deep learning", "torch"]),
    ("flask", &["fastapi", "api", "backend"]),
    ("fastapi", &["flask", "api", "rest api"]),
    ("api", &["rest api", "http", "backend"]),
    ("mongodb", &["nosql", "document db"]),
    ("sql", &["mysql", "postgresql", "relational database"]),
    ("mysql", &["sql", "relational database"]),
    ("postgresql", &["sql", "relational database"]),
    ("javascript", &["node.js", "typescript"]),
    ("typescript", &["javascript"]),
    ("node.js", &["express.js", "backend"]),
    ("react", &["frontend", "javascript", "jsx"]),
    ("next.js", &["react", "frontend"]),
    ("html", &["css", "frontend", "web development"]),
    ("css", &["html", "frontend"]),
    ("data analysis", &["data wrangling", "data cleaning", "pandas", "numpy"]),
    ("hugging face", &["transformers", "bert", "token classification"]),
    ("google colab", &["jupyter"]),
    ("keras", &["tensorflow", "deep learning"]),
    ("data visualization", &["matplotlib", "seaborn", "plotly", "tableau", "power bi"]),
    ("docker", &["kubernetes", "containers"]),
    ("kubernetes", &["docker", "containers"]),
    ("aws", &["cloud computing"]),
    ("azure", &["cloud computing"]),
    ("gcp", &["cloud computing"]),
];

/// Assembles the built-in tables into a definition in registration order.
pub fn builtin_definition() -> TaxonomyDefinition {
    TaxonomyDefinition {
        synonyms: SYNONYMS
            .iter()
            .map(|(canonical, forms)| SynonymEntry {
                canonical: canonical.to_string(),
                forms: forms.iter().map(|f| f.to_string()).collect(),
            })
            .collect(),
        related: RELATED
            .iter()
            .map(|(skill, implies)| RelatedEntry {
                skill: skill.to_string(),
                implies: implies.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
    }
}
