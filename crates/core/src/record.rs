use serde::{Deserialize, Serialize};

use crate::field::Field;

/// The canonical ten-field warehouse record.
///
/// Every key is always present; `""` means unset. Deserialization fills any
/// missing key with `""`, so a partial object from a query store still yields
/// a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub library_name: String,
    pub category: String,
    pub name: String,
    pub unit_price_with_tax: String,
    pub quantity: String,
    pub tax_rate: String,
    pub supplier: String,
    pub sku: String,
    pub created_at: String,
    pub created_by: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LibraryName => &self.library_name,
            Field::Category => &self.category,
            Field::Name => &self.name,
            Field::UnitPriceWithTax => &self.unit_price_with_tax,
            Field::Quantity => &self.quantity,
            Field::TaxRate => &self.tax_rate,
            Field::Supplier => &self.supplier,
            Field::Sku => &self.sku,
            Field::CreatedAt => &self.created_at,
            Field::CreatedBy => &self.created_by,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::LibraryName => &mut self.library_name,
            Field::Category => &mut self.category,
            Field::Name => &mut self.name,
            Field::UnitPriceWithTax => &mut self.unit_price_with_tax,
            Field::Quantity => &mut self.quantity,
            Field::TaxRate => &mut self.tax_rate,
            Field::Supplier => &mut self.supplier,
            Field::Sku => &mut self.sku,
            Field::CreatedAt => &mut self.created_at,
            Field::CreatedBy => &mut self.created_by,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Field/value pairs in render order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
