use colored::Colorize;

/// Collects per-unit failures for one stage so they can be reported together
/// once the stage has finished, without interrupting sibling units.
pub struct Errors {
    errors: Vec<anyhow::Error>,
}

impl Default for Errors {
    fn default() -> Self {
        Self {
            // ideally we won't have any,
            // and we don't mind reallocating if we're already in an error state:
            errors: Vec::with_capacity(0),
        }
    }
}

impl Errors {
    pub fn add_context(&mut self, e: anyhow::Error, msg: String) {
        log::debug!("{msg}: {e:?}");
        self.errors.push(e.context(msg));
    }

    pub fn add(&mut self, e: anyhow::Error) {
        log::debug!("error: {e:?}");
        self.errors.push(e);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Print the full list of errors to stdout.
    /// Returns the number of errors printed.
    pub fn print_recap(&self, label: &str) -> usize {
        if !self.errors.is_empty() {
            println!("\n{} {}:\n", "Encountered errors while".red(), label.red());
            for e in &self.errors {
                recap(e);
            }
        }
        self.errors.len()
    }
}

fn recap(e: &anyhow::Error) {
    print!("{}: {}", "ERRO".red(), e);
    for cause in e.chain().skip(1) {
        print!("\nCaused by:\n\t{}", cause);
    }
    println!();
}
