//! Static series-name classification table.
//!
//! Names are matched exactly (after trimming), so the spellings below are kept
//! as they appear in the upstream store, typos included.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One category and the exact series names it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub names: Vec<String>,
}

/// Ordered category table. Lookup walks entries in declared order and the
/// first entry containing the name wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Econ Indicators",
        &[
            "Consumer Price Index (CPI-U)",
            "Producer Price Index (PPI For Final Demand",
            "Unemployment Rate",
            "Labor Force Participation Rate",
            "Construction Employment",
        ],
    ),
    (
        "Indexes/Inputs",
        &[
            "Final Demand Construction",
            "Inputs to Construction Industries",
            "Inputs to Construction Industries, Energy",
            "Inputs to Construction Industries, Goods",
            "Inputs to Construction Industries, Goods Less Foods",
            "Inputs to Construction Industries, Services",
            "Construction (Partial)",
        ],
    ),
    (
        "Contractors/Services",
        &[
            "Electrical Contractors",
            "Plumbing Contractors",
            "Roofing Contractors",
            "Concrete Contractors",
            "Engineering Services",
            "Architectural Services",
        ],
    ),
    (
        "Metals",
        &[
            "Copper and Brass Mill Shapes",
            "Copper Base Scrap",
            "Steel Mill Products",
            "Fabricated Structural Metal",
            "Fabricated Structural Metal Bar Joists and Rebar",
            "Fabricated Structural Metal for Bridges",
            "Fabricated Structural Metal for Non-Industrial Buildings",
            "Fabricated Steel Plate",
            "Iron and Steel Scrap",
            "Stainless and Alloy Steel Scrap",
            "Prefabricated Metal Buildings",
            "Ornamental and Architectural Metal Work",
            "Sheet Metal Products",
            "Steel Pipe and Tube",
            "Aluminum Mill Shapes",
        ],
    ),
    (
        "Concrete",
        &[
            "Ready Mixed Concrete",
            "Concrete Pipe",
            "Concrete Products",
            "Precast Concrete Products",
            "Prestressed Concrete Products",
            "Concrete Block and Brick",
            "Brick and Structural Clay Tile",
            "Cement",
            "Gypsum Building MAterials",
        ],
    ),
    (
        "Asphalts",
        &[
            "#2 Diesel Fuel",
            "Asphalt (At Refinery)",
            "Asphalt Felts and Coatings",
            "Prepared Asphalt and Tar Rooging and Siding Products",
            "Paving Mixtures",
        ],
    ),
    (
        "General",
        &[
            "Plastic Construction Products",
            "Lumber and Plywood",
            "Insulation Materials",
            "Truck Transportation of Freight",
            "Truck and Bus (Inc Off Highway) Pneumatic Tires",
            "Const, Mining & Forestry Machine and Equipment. Rental and Leasing",
            "Construction MAchinery and Equipment",
        ],
    ),
    (
        "Construction Types",
        &[
            "Architectural Coatings",
            "Flatt Glass",
            "Construction and Sand/Gravel/Crushed Stone",
            "Construction for Government",
            "New Nonresedential Construction",
            "New Nonresidential Building Construction",
            "New Warehouse Building Construction",
            "New School Building Construction",
            "New Office Building Construction",
            "New Industrial Building Construction",
            "New Health Care Building Construction",
            "Maint & Repair of Nonres Buildings (Partial)",
            "Construction for Private Capital Investment",
            "New Residential Construction",
            "Multifamily",
            "Commercial Structures",
            "Healthcare Structures",
            "Industrial Structures",
            "Other Non Residential",
            "Highways and Streets",
            "Power and Communications Structiors",
            "Education and Vocational Structures",
            "Other Misc. Non Residential Construction",
            "Mainenance and Repair Construction",
            "Residential Maintenance and Repair",
            "Nonresidential Maintenance and Repair",
        ],
    ),
];

impl CategoryTable {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        Self { entries }
    }

    /// The construction-materials table shipped with the dashboard.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(category, names)| CategoryEntry {
                    category: (*category).to_string(),
                    names: names.iter().map(|n| (*n).to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Load a table from `[{"category": "...", "names": ["..."]}, ...]`.
    pub fn from_json(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open category table '{}': {e}", path.display())))?;
        let entries: Vec<CategoryEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AppError::new(2, format!("Invalid category table '{}': {e}", path.display())))?;
        if entries.is_empty() {
            return Err(AppError::new(2, format!("Category table '{}' is empty.", path.display())));
        }
        Ok(Self::new(entries))
    }

    /// First category (in declared order) listing `name` exactly.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.names.iter().any(|n| n == name))
            .map(|e| e.category.as_str())
    }

    /// Names listed under more than one category, with every category they appear in.
    ///
    /// Lookup still resolves these to the first category; this is for curation.
    pub fn conflicts(&self) -> Vec<(String, Vec<String>)> {
        let mut out: Vec<(String, Vec<String>)> = Vec::new();
        for entry in &self.entries {
            for name in &entry.names {
                match out.iter_mut().find(|(n, _)| n == name) {
                    Some((_, cats)) => {
                        if !cats.contains(&entry.category) {
                            cats.push(entry.category.clone());
                        }
                    }
                    None => out.push((name.clone(), vec![entry.category.clone()])),
                }
            }
        }
        out.retain(|(_, cats)| cats.len() > 1);
        out
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
