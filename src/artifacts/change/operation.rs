/// Kind of edit a user asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Upload,
}

impl Operation {
    /// Capitalized verb used in pull-request titles
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Upload => "Upload",
        }
    }

    /// Pages are Markdown files under the docs root; uploads are assets
    pub fn is_page_operation(&self) -> bool {
        !matches!(self, Operation::Upload)
    }

    pub fn default_message(&self, path: &str) -> String {
        match self {
            Operation::Create => "Add new documentation page".to_string(),
            Operation::Update => format!("Update {path}"),
            Operation::Delete => format!("Delete {path}"),
            Operation::Upload => "Add documentation asset".to_string(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.action().to_lowercase())
    }
}
