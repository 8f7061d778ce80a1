/// Generate an opaque resource id. It carries no meaning for the remote platform.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
