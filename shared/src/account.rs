//! 账户管理：资料、密码、收货地址

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::{ApiClient, HttpClient};
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::protocol::{
    ChangePasswordRequest, CreateAddressRequest, DeleteAddressRequest, GetProfileRequest,
    ListAddressesRequest, UpdateAddressRequest, UpdateProfileRequest,
};
use crate::session::User;
use crate::storage::KeyValueStore;

pub const WRONG_CURRENT_PASSWORD: &str = "Wrong current password";

// =========================================================
// Profile
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

// =========================================================
// Password
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeForm {
    pub current: String,
    pub new_password: String,
    pub confirm: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.current.is_empty() || self.new_password.is_empty() || self.confirm.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.new_password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// =========================================================
// Address
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressType {
    #[default]
    Home,
    #[serde(alias = "OFFICE")]
    Work,
    Other,
}

impl AddressType {
    pub const ALL: [AddressType; 3] = [AddressType::Home, AddressType::Work, AddressType::Other];

    pub fn label(&self) -> &'static str {
        match self {
            AddressType::Home => "Home",
            AddressType::Work => "Office",
            AddressType::Other => "Other",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Home => "HOME",
            AddressType::Work => "WORK",
            AddressType::Other => "OTHER",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "HOME" => AddressType::Home,
            "WORK" | "OFFICE" => AddressType::Work,
            _ => AddressType::Other,
        }
    }
}

/// 地址表单（不含 id）；可选字段为空时以 null 提交
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(rename = "type", default)]
    pub kind: AddressType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(
        default,
        serialize_with = "blank_as_null",
        deserialize_with = "null_as_empty"
    )]
    pub alt_phone: String,
    #[serde(
        default,
        serialize_with = "blank_as_null",
        deserialize_with = "null_as_empty"
    )]
    pub landmark: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line: String,
}

impl AddressDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            &self.name,
            &self.phone,
            &self.city,
            &self.postal_code,
            &self.line,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }

    /// "12 Rue Cambon, Paris 75001"
    pub fn one_line(&self) -> String {
        let mut out = self.line.trim().to_string();
        if !self.landmark.trim().is_empty() {
            out.push_str(&format!(" (near {})", self.landmark.trim()));
        }
        out.push_str(&format!(", {} {}", self.city.trim(), self.postal_code.trim()));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    #[serde(flatten)]
    pub fields: AddressDraft,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_null<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(trimmed)
    }
}

// =========================================================
// 逆地理编码
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

/// 逆地理编码结果中用到的字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReverseGeocode {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: GeoAddress,
}

impl ReverseGeocode {
    pub fn city(&self) -> Option<&str> {
        [&self.address.city, &self.address.town, &self.address.village]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }

    /// 只覆盖有值的字段
    pub fn apply_to(&self, draft: &mut AddressDraft) {
        if let Some(line) = self.display_name.as_deref().filter(|s| !s.trim().is_empty()) {
            draft.line = line.to_string();
        }
        if let Some(city) = self.city() {
            draft.city = city.to_string();
        }
        if let Some(code) = self.address.postcode.as_deref().filter(|s| !s.trim().is_empty()) {
            draft.postal_code = code.to_string();
        }
    }
}

// =========================================================
// API
// =========================================================

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    pub async fn fetch_profile(&self) -> ApiResult<Profile> {
        self.send(&GetProfileRequest).await
    }

    pub async fn update_profile(&self, profile: &Profile) -> ApiResult<()> {
        self.send(&UpdateProfileRequest {
            name: profile.name.trim().to_string(),
            phone: profile.phone.trim().to_string(),
        })
        .await
        .map_err(|e| e.or_message("Update failed").in_op("account.update_profile"))
    }

    /// 修改密码；第三方登录的账户没有本地密码
    pub async fn change_password(&self, user: &User, form: &PasswordChangeForm) -> ApiResult<String> {
        if !user.has_local_password() {
            return Err(ValidationError::ExternalAccount(user.provider.label().to_string()).into());
        }
        form.validate()?;

        self.send(&ChangePasswordRequest {
            current_password: form.current.clone(),
            new_password: form.new_password.clone(),
        })
        .await
        .map_err(|e| e.or_message(WRONG_CURRENT_PASSWORD).in_op("account.change_password"))
    }

    pub async fn fetch_addresses(&self) -> ApiResult<Vec<Address>> {
        self.send(&ListAddressesRequest).await
    }

    pub async fn create_address(&self, draft: &AddressDraft) -> ApiResult<()> {
        draft.validate()?;
        self.send(&CreateAddressRequest {
            draft: draft.clone(),
        })
        .await
        .map_err(|e| e.or_message("Save failed").in_op("account.create_address"))
    }

    pub async fn update_address(&self, address: &Address) -> ApiResult<()> {
        address.fields.validate()?;
        self.send(&UpdateAddressRequest {
            address: address.clone(),
        })
        .await
        .map_err(|e| {
            e.or_message("Update failed")
                .in_op_with("account.update_address", address.id.to_string())
        })
    }

    pub async fn delete_address(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteAddressRequest { id })
            .await
            .map_err(|e| e.in_op_with("account.delete_address", id.to_string()))
    }

    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> ApiResult<ReverseGeocode> {
        let url = self.config().reverse_geocode_url(latitude, longitude);
        self.get_external_json(&url)
            .await
            .map_err(|e: ApiError| e.in_op("account.reverse_geocode"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockHttpClient;
    use crate::config::AppConfig;
    use crate::error::ApiErrorKind;
    use crate::session::{AuthProvider, Role};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn user(provider: AuthProvider) -> User {
        User {
            name: "Claire Dubois".into(),
            email: "claire@maison-noir.com".into(),
            role: Role::User,
            provider,
        }
    }

    fn filled_draft() -> AddressDraft {
        AddressDraft {
            kind: AddressType::Work,
            name: "Claire Dubois".into(),
            phone: "+33 1 23 45 67 89".into(),
            alt_phone: "  ".into(),
            landmark: String::new(),
            city: "Paris".into(),
            postal_code: "75001".into(),
            line: "31 Rue Cambon".into(),
        }
    }

    #[test]
    fn test_address_wire_format() {
        let value = serde_json::to_value(Address {
            id: 9,
            fields: filled_draft(),
        })
        .unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["type"], "WORK");
        assert_eq!(value["postalCode"], "75001");
        assert!(value["altPhone"].is_null());
        assert!(value["landmark"].is_null());

        let parsed: Address = serde_json::from_value(json!({
            "id": 3, "type": "OFFICE", "name": "A", "phone": "1",
            "altPhone": null, "city": "Lyon", "postalCode": "69001", "line": "x"
        }))
        .unwrap();
        assert_eq!(parsed.fields.kind, AddressType::Work);
        assert_eq!(parsed.fields.alt_phone, "");
        assert_eq!(parsed.fields.kind.label(), "Office");
    }

    #[test]
    fn test_required_fields() {
        assert!(filled_draft().validate().is_ok());
        let mut draft = filled_draft();
        draft.postal_code = " ".into();
        assert_eq!(draft.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_geocode_only_overwrites_present_fields() {
        let geo: ReverseGeocode = serde_json::from_value(json!({
            "display_name": "Place Vendôme, Paris",
            "address": { "town": "Paris 1er", "postcode": null }
        }))
        .unwrap();

        let mut draft = filled_draft();
        geo.apply_to(&mut draft);
        assert_eq!(draft.line, "Place Vendôme, Paris");
        assert_eq!(draft.city, "Paris 1er");
        assert_eq!(draft.postal_code, "75001");

        let empty = ReverseGeocode::default();
        let before = draft.clone();
        empty.apply_to(&mut draft);
        assert_eq!(draft, before);
    }

    #[test]
    fn test_password_form_validation() {
        let mut form = PasswordChangeForm {
            current: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm: "new-secreT".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
        form.confirm = "new-secret".into();
        assert!(form.validate().is_ok());
        form.clear();
        assert_eq!(form.validate(), Err(ValidationError::MissingFields));
    }

    #[tokio::test]
    async fn test_change_password_blocked_for_google_accounts() {
        let http = MockHttpClient::new();
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());
        let form = PasswordChangeForm {
            current: "a".into(),
            new_password: "b".into(),
            confirm: "b".into(),
        };

        let err = client
            .change_password(&user(AuthProvider::Google), &form)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert!(err.user_message().contains("Google"));
        assert!(http.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_change_password_surfaces_backend_text() {
        let http = MockHttpClient::new();
        let key = "PUT http://localhost:8080/api/user/password";
        http.mock_text(key, 400, "Current password is incorrect");
        http.mock_text(key, 400, "");
        http.mock_text(key, 200, "Password updated");
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());
        let form = PasswordChangeForm {
            current: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm: "new-secret".into(),
        };
        let local = user(AuthProvider::Local);

        let err = client.change_password(&local, &form).await.unwrap_err();
        assert_eq!(err.user_message(), "Current password is incorrect");
        let err = client.change_password(&local, &form).await.unwrap_err();
        assert_eq!(err.user_message(), WRONG_CURRENT_PASSWORD);
        assert_eq!(client.change_password(&local, &form).await.unwrap(), "Password updated");

        let body: serde_json::Value =
            serde_json::from_str(http.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "currentPassword": "old-secret", "newPassword": "new-secret" }));
    }

    #[tokio::test]
    async fn test_address_crud_targets() {
        let http = MockHttpClient::new();
        http.mock_response("POST http://localhost:8080/api/address", 200, json!({ "id": 4 }));
        http.mock_response("PUT http://localhost:8080/api/address/4", 200, json!({ "id": 4 }));
        http.mock_text("DELETE http://localhost:8080/api/address/4", 204, "");
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        client.create_address(&filled_draft()).await.unwrap();
        client
            .update_address(&Address {
                id: 4,
                fields: filled_draft(),
            })
            .await
            .unwrap();
        client.delete_address(4).await.unwrap();

        assert_eq!(
            http.request_keys(),
            vec![
                "POST http://localhost:8080/api/address",
                "PUT http://localhost:8080/api/address/4",
                "DELETE http://localhost:8080/api/address/4",
            ]
        );
    }

    #[tokio::test]
    async fn test_reverse_geocode_url() {
        let http = MockHttpClient::new();
        http.mock_response(
            "GET https://nominatim.openstreetmap.org/reverse?lat=48.8675&lon=2.3294&format=json",
            200,
            json!({ "display_name": "Rue Cambon", "address": { "city": "Paris", "postcode": "75001" } }),
        );
        let client = ApiClient::new(http, MemoryStore::new(), AppConfig::default());

        let geo = client.reverse_geocode(48.8675, 2.3294).await.unwrap();
        assert_eq!(geo.city(), Some("Paris"));
    }
}
