use md5::{Digest, Md5};
use uuid::Uuid;

/// Client id reported to the game for offline sessions.
pub const OFFLINE_CLIENT_ID: &str = "00000000402B5328";

/// Identity values substituted into the launch templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAccountProfile {
    pub username: String,
    pub uuid: Uuid,
    pub access_token: String,
    pub xuid: String,
    pub user_type: String,
    pub client_id: String,
}

impl LaunchAccountProfile {
    pub fn offline(username: &str) -> Self {
        let username = match username.trim() {
            "" => "Player",
            trimmed => trimmed,
        };
        Self {
            username: username.to_string(),
            uuid: offline_uuid(username),
            access_token: "0".into(),
            xuid: "0".into(),
            user_type: "legacy".into(),
            client_id: OFFLINE_CLIENT_ID.into(),
        }
    }

    /// Legacy `--session` token format.
    pub fn session(&self) -> String {
        format!("token:{}:{}", self.access_token, self.uuid.simple())
    }
}

/// Name-based (MD5, version 3) UUID of `OfflinePlayer:<name>`, the same
/// derivation servers in offline mode use.
pub fn offline_uuid(username: &str) -> Uuid {
    let digest = Md5::digest(format!("OfflinePlayer:{username}").as_bytes());
    uuid::Builder::from_md5_bytes(digest.into()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_uuid_is_stable_and_version_3() {
        let a = offline_uuid("Notch");
        assert_eq!(a, offline_uuid("Notch"));
        assert_ne!(a, offline_uuid("notch"));
        assert_eq!(a.get_version_num(), 3);
        assert_eq!(a.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn offline_uuid_matches_known_value() {
        // md5("OfflinePlayer:Notch") with version/variant bits applied.
        assert_eq!(
            offline_uuid("Notch").to_string(),
            "b50ad385-829d-3141-a216-7e7d7539ba7f"
        );
    }

    #[test]
    fn blank_username_falls_back() {
        let profile = LaunchAccountProfile::offline("  ");
        assert_eq!(profile.username, "Player");
        assert_eq!(profile.access_token, "0");
        assert_eq!(profile.user_type, "legacy");
    }
}
