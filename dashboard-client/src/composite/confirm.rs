/// Prompt shown before a composite delete
pub const DELETE_PROMPT: &str =
    "Delete this zone and its distributor? This action cannot be undone.";

/// Explicit yes/no gate in front of destructive operations
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
