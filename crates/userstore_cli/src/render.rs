//! Write-only serialization of user responses.
//!
//! Values are embedded verbatim; there is no escaping of quote characters
//! in caller-supplied content (contract baseline, matched by the flat
//! payload reader on the input side).

use userstore_core::UserResponse;

/// Renders one user as a flat object literal.
pub fn render_user(user: &UserResponse) -> String {
    format!(
        "{{\"id\":{},\"name\":\"{}\",\"email\":\"{}\"}}",
        user.id, user.name, user.email
    )
}

/// Renders a sequence of users as a bracketed, comma-separated list.
pub fn render_users(users: &[UserResponse]) -> String {
    let items: Vec<String> = users.iter().map(render_user).collect();
    format!("[{}]", items.join(","))
}
