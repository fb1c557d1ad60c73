/// Prompt shown before a product is deleted.
pub const DELETE_PROMPT: &str = "¿Estás seguro de que deseas eliminar este producto?";

/// A blocking yes/no decision surfaced to the user.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, for non-interactive callers.
#[derive(Debug, Clone, Copy)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
