//! Singleton documents: vendor settings and homepage copy.

use serde::{Deserialize, Serialize};

/// Settings key under which the vendor record is stored.
pub const VENDOR_SETTINGS_KEY: &str = "vendor";

/// Vendor contact details rendered onto invoices and purchase orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorSettings {
    pub company_name: String,
    pub street_address: String,
    pub city_state_zip: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    pub email: String,
    pub contact_name: String,
}

impl Default for VendorSettings {
    fn default() -> Self {
        Self {
            company_name: "BioVibe Peptides".to_string(),
            street_address: "[Street Address]".to_string(),
            city_state_zip: "[City, ST ZIP]".to_string(),
            phone: "(000) 000-0000".to_string(),
            fax: "(000) 000-0000".to_string(),
            website: "biovibepeptides.com".to_string(),
            email: "support@biovibepeptides.com".to_string(),
            contact_name: "[Contact Name]".to_string(),
        }
    }
}

/// A homepage feature tile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

/// A homepage service card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Service {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Editable homepage and order-page copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteContent {
    pub hero_title: String,
    pub hero_title_highlight: String,
    pub hero_subtitle: String,
    pub hero_cta_text: String,
    pub hero_cta_link: String,
    pub hero_image_caption: String,
    pub hero_image_sub_caption: String,

    pub features_section_title: String,
    pub features: Vec<Feature>,

    pub services_section_label: String,
    pub services_section_title: String,
    pub services: Vec<Service>,

    pub contact_title: String,
    pub contact_subtitle: String,
    pub contact_email: String,

    pub copyright_text: String,

    pub secure_page_title: String,
    pub secure_page_description: String,
    pub secure_page_contact_text: String,
    pub secure_page_disclaimer: String,
    pub secure_page_fee_text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn feature(title: &str, description: &str) -> Feature {
    Feature {
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn service(title: &str, description: &str, tags: &[&str]) -> Service {
    Service {
        title: title.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            hero_title: "Supporting Providers with Guidance on".to_string(),
            hero_title_highlight: "Peptide Solutions".to_string(),
            hero_subtitle: "Trusted, research-backed insights for optimizing patient wellness. \
                We help healthcare professionals navigate the peptide landscape with precision and confidence."
                .to_string(),
            hero_cta_text: "Start a Consultation".to_string(),
            hero_cta_link: "/secure".to_string(),
            hero_image_caption: "Advanced Peptide Science".to_string(),
            hero_image_sub_caption: "Enhancing Patient Outcomes".to_string(),

            features_section_title: "Why Providers Partner With Us".to_string(),
            features: vec![
                feature("Clarity", "Navigating the peptide landscape with precision."),
                feature("Compliance", "Guidance on regulatory standards."),
                feature("Provider Support", "Direct expertise for healthcare professionals."),
                feature("Transparency", "Honest information on peptide solutions."),
            ],

            services_section_label: "Our Expertise".to_string(),
            services_section_title: "Areas of Consultation".to_string(),
            services: vec![
                service(
                    "Peptide Blends",
                    "Custom combinations tailored for specific therapeutic goals.",
                    &["Custom", "Specific"],
                ),
                service(
                    "Capsules & Formats",
                    "Alternative delivery systems beyond traditional injectables.",
                    &["Oral", "Topical"],
                ),
                service(
                    "Advanced Compounds",
                    "Specialized solutions for complex patient needs.",
                    &["Research", "Clinical"],
                ),
            ],

            contact_title: "Ready to optimize your practice?".to_string(),
            contact_subtitle: "Connect with our team to learn how BioVibe Peptides can support your patient outcomes."
                .to_string(),
            contact_email: "support@biovibepeptides.com".to_string(),

            copyright_text: "© 2024 BioVibe Peptides. All rights reserved.".to_string(),

            secure_page_title: "BioVibe Private Secure Order Form".to_string(),
            secure_page_description: "Please fill the correct quantities of items you need and submit your order. \
                Once your form has been submitted, you will receive an email with a copy of the order \
                and our team will reach out to collect payment."
                .to_string(),
            secure_page_contact_text: "If you have any questions, contact us at".to_string(),
            secure_page_disclaimer: "⚠️ Disclaimer: Peptides are NOT FDA approved. \
                It should be used under the guidance of a medical provider."
                .to_string(),
            secure_page_fee_text: "A standard 5% processing fee is added to each order \
                to ensure secure processing and fulfillment."
                .to_string(),
            updated_at: None,
        }
    }
}

impl SiteContent {
    /// Overlay the keys present in `patch` onto this document.
    pub fn merged_with(&self, patch: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut current = serde_json::to_value(self)?;
        if let (Some(target), Some(source)) = (current.as_object_mut(), patch.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_partial_body_keeps_defaults() {
        let vendor: VendorSettings =
            serde_json::from_str(r#"{"companyName":"Acme Labs"}"#).unwrap();
        assert_eq!(vendor.company_name, "Acme Labs");
        assert_eq!(vendor.website, "biovibepeptides.com");
    }

    #[test]
    fn test_site_content_merge_overrides_only_given_keys() {
        let content = SiteContent::default();
        let merged = content
            .merged_with(&serde_json::json!({ "heroTitle": "New headline" }))
            .unwrap();
        assert_eq!(merged.hero_title, "New headline");
        assert_eq!(merged.hero_cta_link, "/secure");
        assert_eq!(merged.features.len(), 4);
    }

    #[test]
    fn test_site_content_merge_rejects_wrong_types() {
        let content = SiteContent::default();
        assert!(content
            .merged_with(&serde_json::json!({ "features": "not a list" }))
            .is_err());
    }
}
