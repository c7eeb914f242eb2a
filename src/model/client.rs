use super::Model;

/// Clients are free-form documents; nothing beyond the identifier is enforced.
pub struct Client;

impl Model for Client {
    const COLLECTION: &'static str = "clients";
    const NOT_FOUND: &'static str = "Client non trouvé";
    const DELETED: &'static str = "Client supprimé avec succès";
}
