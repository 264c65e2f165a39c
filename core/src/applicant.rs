//! The applicant record submitted for scoring.
//!
//! # Design
//! A pass-through value: the caller owns validation and formatting, this crate
//! only serializes it. Every field is a string because the vendor's `Applicant`
//! XML carries text nodes only — dates included, in whatever format the
//! caller's vendor agreement specifies.

use serde::{Deserialize, Serialize};

use crate::xml;

/// Applicant attributes, serialized into the outbound `Applicant` XML field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub external_application_id: String,
    pub session_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address_phone_number: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub previous_address: String,
    pub previous_city: String,
    pub previous_province: String,
    pub previous_postal_code: String,
    pub employer_name: String,
    pub occupation: String,
    pub birth_date: String,
    pub sin_number: String,
}

impl Applicant {
    /// Serialize to the vendor's `Applicant` XML document. Element order is
    /// fixed; tag names are the vendor's, not ours.
    pub fn to_xml(&self) -> String {
        xml::build_document(
            "Applicant",
            &[
                ("FirstName", &self.first_name),
                ("LastName", &self.last_name),
                ("Email", &self.email),
                ("AddressPhoneNumber", &self.address_phone_number),
                ("UnparsedAddrLine1", &self.address),
                ("AddressCity", &self.city),
                ("AddressStProv", &self.province),
                ("AddressZipPostal", &self.postal_code),
                ("PreviousUnparsedAddrLine1", &self.previous_address),
                ("PreviousAddressCity", &self.previous_city),
                ("PreviousAddressStProv", &self.previous_province),
                ("PreviousAddressZipPostal", &self.previous_postal_code),
                ("EmployerName", &self.employer_name),
                ("Occupation", &self.occupation),
                ("BirthDate", &self.birth_date),
                ("SIN", &self.sin_number),
            ],
        )
    }
}
