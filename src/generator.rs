//! TypeScript generation.
//!
//! The generated module loads `dotenv` and exports one `string` constant per
//! variable. Presence at runtime is asserted with `!`, not checked.

/// Package the generated module depends on at runtime.
pub const RUNTIME_DEPENDENCY: &str = "dotenv";

const PREAMBLE: &str = "import * as dotenv from 'dotenv';\n\ndotenv.config();\n\n";

/// Generated TypeScript together with the names it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub variables: Vec<String>,
    pub content: String,
}

impl Generation {
    pub fn new(variables: Vec<String>) -> Self {
        let content = render(&variables);
        Self { variables, content }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Render the module for `variables`, one export per name in order.
pub fn render(variables: &[String]) -> String {
    let mut content = String::from(PREAMBLE);
    for name in variables {
        content.push_str(&format!(
            "export const {name}: string = process.env.{name}!;\n"
        ));
    }
    content
}
