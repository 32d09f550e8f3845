auto_derived!(
    /// Server invite as reported by the platform
    pub struct Invite {
        /// Invite code
        pub code: String,
        /// Number of times this invite has been used
        pub uses: u64,
    }
);

impl Invite {
    /// Create an invite with the given use count
    pub fn new(code: impl Into<String>, uses: u64) -> Invite {
        Invite {
            code: code.into(),
            uses,
        }
    }
}
