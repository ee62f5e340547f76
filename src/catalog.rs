use serde::Serialize;

// Static reference catalogs offered to the UI as selectable options.
// Loaded into the binary at compile time and never mutated.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

pub const CLINICS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "clinic1",
        name: "Main Medical Center",
        description: None,
    },
    CatalogEntry {
        id: "clinic2",
        name: "North Wellness Clinic",
        description: None,
    },
    CatalogEntry {
        id: "clinic3",
        name: "Westside Health Facility",
        description: None,
    },
    CatalogEntry {
        id: "clinic4",
        name: "Downtown Medical Plaza",
        description: None,
    },
];

pub const DEPARTMENTS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "dept1",
        name: "Reception",
        description: None,
    },
    CatalogEntry {
        id: "dept2",
        name: "Administration",
        description: None,
    },
    CatalogEntry {
        id: "dept3",
        name: "General Practice",
        description: None,
    },
    CatalogEntry {
        id: "dept4",
        name: "Pediatrics",
        description: None,
    },
    CatalogEntry {
        id: "dept5",
        name: "Cardiology",
        description: None,
    },
    CatalogEntry {
        id: "dept6",
        name: "Orthopedics",
        description: None,
    },
    CatalogEntry {
        id: "dept7",
        name: "Laboratory",
        description: None,
    },
    CatalogEntry {
        id: "dept8",
        name: "Radiology",
        description: None,
    },
    CatalogEntry {
        id: "dept9",
        name: "Pharmacy",
        description: None,
    },
];

pub const PRIORITIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "low",
        name: "Low",
        description: Some("Non-urgent issue, can be addressed when convenient"),
    },
    CatalogEntry {
        id: "medium",
        name: "Medium",
        description: Some("Important but not time-sensitive"),
    },
    CatalogEntry {
        id: "high",
        name: "High",
        description: Some("Requires prompt attention"),
    },
    CatalogEntry {
        id: "urgent",
        name: "Urgent",
        description: Some("Critical issue requiring immediate resolution"),
    },
];

/// Resolves a catalog id to its display name, for rendering the review phase.
pub fn display_name(catalog: &[CatalogEntry], id: &str) -> Option<&'static str> {
    catalog.iter().find(|entry| entry.id == id).map(|entry| entry.name)
}
