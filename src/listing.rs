use std::collections::HashMap;
use std::path::PathBuf;

use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

use crate::error::{AceError, Result};
use crate::helpers::compute_temperature_from_kT;
use crate::nuclide::NuclideBuilder;
use crate::sab::{SAlphaBeta, SAlphaBetaBuilder};

//=====================================================================
// Entries of a cross section library index (cross_sections.xml). Each
// entry says where one table lives on disk and carries enough of its
// header to identify it without reading the table itself.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum TableKind {
    Neutron = 1,
    Thermal = 2,
}

impl TableKind {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "table kind", code })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum FileType {
    Ascii = 1,
    Binary = 2,
}

impl FileType {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "library file type", code })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XsListing {
    pub name: String,
    pub alias: String,
    pub kind: TableKind,
    pub zaid: u32,
    pub filetype: FileType,
    pub location: usize,
    pub recl: usize,
    pub entries: usize,
    pub awr: f64,
    pub kT: f64,
    pub metastable: bool,
    pub path: PathBuf,
}

impl XsListing {
    pub fn temperature(&self) -> f64 {
        compute_temperature_from_kT(self.kT)
    }
}

impl std::fmt::Display for XsListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "XsListing({}, {}, {})", self.name, self.kind, self.path.display())
    }
}

//=====================================================================
// The full index, addressable by position, name or alias. Positions
// are stable once pushed; they are what `Nuclide::listing` stores.
//=====================================================================
#[derive(Debug, Clone, Default)]
pub struct XsListings {
    listings: Vec<XsListing>,
    by_name: HashMap<String, usize>,
}

impl XsListings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listings(listings: impl IntoIterator<Item = XsListing>) -> Result<Self> {
        let mut index = Self::new();
        for listing in listings {
            index.push(listing)?;
        }
        Ok(index)
    }

    // Add a listing, returning its position. Names and aliases share
    // one namespace and must not collide.
    pub fn push(&mut self, listing: XsListing) -> Result<usize> {
        let position = self.listings.len();
        for key in [&listing.name, &listing.alias] {
            if !key.is_empty() && self.by_name.contains_key(key) {
                return Err(AceError::shape("XsListings", format!("duplicate table name or alias {}", key)));
            }
        }
        if listing.name.is_empty() {
            return Err(AceError::shape("XsListings", "table name is empty"));
        }
        if listing.alias == listing.name {
            return Err(AceError::shape("XsListings", format!("alias of {} repeats its name", listing.name)));
        }

        self.by_name.insert(listing.name.clone(), position);
        if !listing.alias.is_empty() {
            self.by_name.insert(listing.alias.clone(), position);
        }
        self.listings.push(listing);
        Ok(position)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&XsListing> {
        self.listings.get(position)
    }

    pub fn position(&self, name_or_alias: &str) -> Option<usize> {
        self.by_name.get(name_or_alias).copied()
    }

    pub fn find(&self, name_or_alias: &str) -> Option<&XsListing> {
        self.position(name_or_alias).map(|i| &self.listings[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XsListing> {
        self.listings.iter()
    }

    // Start a nuclide whose identity comes from a neutron listing
    pub fn nuclide_builder(&self, name_or_alias: &str) -> Option<NuclideBuilder> {
        let position = self.position(name_or_alias)?;
        let listing = &self.listings[position];
        (listing.kind == TableKind::Neutron)
            .then(|| NuclideBuilder::new(&listing.name, listing.zaid, listing.awr, listing.kT).listing(position))
    }

    // Start a thermal scattering table whose identity comes from a thermal listing
    pub fn sab_builder(&self, name_or_alias: &str) -> Option<SAlphaBetaBuilder> {
        let listing = self.find(name_or_alias)?;
        (listing.kind == TableKind::Thermal)
            .then(|| SAlphaBeta::builder(&listing.name, listing.zaid, listing.awr, listing.kT))
    }
}

impl<'a> IntoIterator for &'a XsListings {
    type Item = &'a XsListing;
    type IntoIter = std::slice::Iter<'a, XsListing>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
