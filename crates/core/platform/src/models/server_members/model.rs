auto_derived!(
    /// Server member
    pub struct Member {
        /// Unique member id
        pub id: MemberCompositeKey,
        /// Human readable tag of the user, used for logging
        pub tag: String,
        /// Whether the member has yet to pass membership screening
        pub pending: bool,
        /// Ids of roles the member holds
        pub roles: Vec<String>,
    }

    /// Composite primary key consisting of server and user id
    #[derive(Hash, Default)]
    pub struct MemberCompositeKey {
        /// Server Id
        pub server: String,
        /// User Id
        pub user: String,
    }
);

impl Member {
    /// Create a member who holds no roles yet
    pub fn new(server: &str, user: &str, tag: &str, pending: bool) -> Member {
        Member {
            id: MemberCompositeKey {
                server: server.to_string(),
                user: user.to_string(),
            },
            tag: tag.to_string(),
            pending,
            roles: vec![],
        }
    }
}
