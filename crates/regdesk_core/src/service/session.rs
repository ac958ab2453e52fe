//! Explicit session context threaded into store-backed use-cases.

/// Authentication state of the caller.
///
/// Passed by value into every use-case that needs it; core never looks up
/// an ambient signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user_id: Option<String>,
}

impl SessionContext {
    /// Session without a signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for a signed-in user. A blank id counts as anonymous.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::SessionContext;

    #[test]
    fn blank_user_id_is_anonymous() {
        assert!(!SessionContext::signed_in("  ").is_authenticated());
        assert_eq!(SessionContext::signed_in("uid-7").user_id(), Some("uid-7"));
    }
}
