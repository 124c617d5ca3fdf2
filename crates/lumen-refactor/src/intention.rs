use lumen_psi::{ExprId, ProjectId, PsiError, PsiTree};

/// The fixed callback contract a quick fix exposes to the host driver.
///
/// The driver checks availability, shows the label, and invokes the fix
/// inside a write action when [`IntentionAction::starts_write_action`] says
/// so. `invoke` returns the node now standing where the rewritten expression
/// stood, so the driver can keep its caret/selection anchored.
pub trait IntentionAction {
    /// User-facing label for this specific fix instance.
    fn text(&self) -> String;

    /// Label grouping related fixes.
    fn family_name(&self) -> &'static str;

    /// Whether the fix can still run. Captured nodes may have been
    /// invalidated by unrelated edits, or belong to a different project than
    /// the invoking one; both report unavailable rather than failing.
    fn is_available(&self, tree: &PsiTree, project: ProjectId) -> bool;

    fn invoke(&self, tree: &mut PsiTree) -> Result<ExprId, PsiError>;

    /// Whether `invoke` must run inside the host's write action.
    fn starts_write_action(&self) -> bool {
        true
    }
}
