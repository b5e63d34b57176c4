use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member document as the backend serves it. Read-only on this side; the
/// station only resolves ids and prints names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// 24-hex opaque id for current members, decimal string for legacy ones
    pub member_id: String,
    pub name: String,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub nic_number: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub qr_code_data: String,
    #[serde(default)]
    pub fingerprint_data: String,
    #[serde(default)]
    pub face_image_data: String,
    pub membership_start_date: NaiveDate,
    pub active_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_wire_format() {
        let json = r#"{
            "memberId": "1a2b3c4d5e6f7a8b9c0d1e2f",
            "name": "John Doe",
            "age": 32,
            "height": 180.0,
            "weight": 78.5,
            "nicNumber": "912345678V",
            "email": "john.doe@example.com",
            "address": "12 Main St",
            "qrCodeData": "memberId: 1a2b3c4d5e6f7a8b9c0d1e2f",
            "fingerprintData": "",
            "faceImageData": "",
            "membershipStartDate": "2024-01-01",
            "activeStatus": true
        }"#;

        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.member_id, "1a2b3c4d5e6f7a8b9c0d1e2f");
        assert_eq!(member.name, "John Doe");
        assert!(member.active_status);
        assert_eq!(member.mobile_number, None);
    }
}
