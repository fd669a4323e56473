use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the ten keys of a warehouse record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    LibraryName,
    Category,
    Name,
    UnitPriceWithTax,
    Quantity,
    TaxRate,
    Supplier,
    Sku,
    CreatedAt,
    CreatedBy,
}

impl Field {
    /// Render order of the form.
    pub const ALL: [Field; 10] = [
        Field::LibraryName,
        Field::Category,
        Field::Name,
        Field::UnitPriceWithTax,
        Field::Quantity,
        Field::TaxRate,
        Field::Supplier,
        Field::Sku,
        Field::CreatedAt,
        Field::CreatedBy,
    ];

    pub const EDITABLE: [Field; 8] = [
        Field::LibraryName,
        Field::Category,
        Field::Name,
        Field::UnitPriceWithTax,
        Field::Quantity,
        Field::TaxRate,
        Field::Supplier,
        Field::Sku,
    ];

    /// Fields offered by the chooser's field selector, in selector order.
    pub const QUERYABLE: [Field; 5] = [
        Field::Sku,
        Field::Category,
        Field::Name,
        Field::Supplier,
        Field::LibraryName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LibraryName => "libraryName",
            Self::Category => "category",
            Self::Name => "name",
            Self::UnitPriceWithTax => "unitPriceWithTax",
            Self::Quantity => "quantity",
            Self::TaxRate => "taxRate",
            Self::Supplier => "supplier",
            Self::Sku => "sku",
            Self::CreatedAt => "createdAt",
            Self::CreatedBy => "createdBy",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }

    /// Provenance fields are system-resolved and never user-editable.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::CreatedAt | Self::CreatedBy)
    }

    pub fn is_queryable(&self) -> bool {
        Self::QUERYABLE.contains(self)
    }

    /// Label key handed to the host's translation lookup.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LibraryName => "Library",
            Self::Category => "Category",
            Self::Name => "Name",
            Self::UnitPriceWithTax => "Unit price (tax incl.)",
            Self::Quantity => "Quantity",
            Self::TaxRate => "Tax rate",
            Self::Supplier => "Supplier",
            Self::Sku => "SKU",
            Self::CreatedAt => "Created at",
            Self::CreatedBy => "Created by",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
