//! Location reference resolution

use std::sync::Arc;

use mx_backend::{Backend, LocationRepository};
use mx_contracts::work_orders::attributes;
use mx_core::error::{MxError, ValidationErrors};
use mx_core::result::MxResult;
use mx_core::traits::Id;

use crate::work_orders::LocationRef;

/// Turns a form's location reference into a location id
pub struct LocationResolver<B: Backend> {
    locations: LocationRepository<B>,
}

impl<B: Backend> LocationResolver<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            locations: LocationRepository::new(backend),
        }
    }

    /// Ids pass through; labels are looked up among the tenant's locations
    ///
    /// An unknown label is a validation error on `location`.
    pub async fn resolve(&self, tenant_id: Id, location: Option<&LocationRef>) -> MxResult<Option<Id>> {
        match location {
            None => Ok(None),
            Some(LocationRef::Id(id)) => Ok(Some(*id)),
            Some(LocationRef::Label(label)) => {
                match self.locations.find_by_label(tenant_id, label).await? {
                    Some(location) => Ok(Some(location.id)),
                    None => {
                        let mut errors = ValidationErrors::new();
                        errors.add(attributes::LOCATION, "is not a known location");
                        Err(MxError::Validation(errors))
                    }
                }
            }
        }
    }
}
