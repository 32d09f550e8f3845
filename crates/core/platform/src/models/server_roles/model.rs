auto_derived!(
    /// Server role
    pub struct Role {
        /// Role id
        pub id: String,
        /// Role name
        pub name: String,
    }
);
