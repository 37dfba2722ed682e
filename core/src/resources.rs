//! Catalogue of Productive collections and their allowed operations.

use crate::client::ApiClient;
use crate::http::Transport;
use crate::resource::{Capabilities, Resource, ResourceDescriptor};

pub const BOOKINGS: ResourceDescriptor = ResourceDescriptor::new("/bookings", Capabilities::ALL);
pub const COMPANIES: ResourceDescriptor =
    ResourceDescriptor::new("/companies", Capabilities::READ_WRITE);
pub const DEALS: ResourceDescriptor = ResourceDescriptor::new("/deals", Capabilities::ALL);
pub const PEOPLE: ResourceDescriptor = ResourceDescriptor::new("/people", Capabilities::READ);
pub const PROJECTS: ResourceDescriptor =
    ResourceDescriptor::new("/projects", Capabilities::READ_WRITE);
pub const SERVICES: ResourceDescriptor = ResourceDescriptor::new("/services", Capabilities::READ);
pub const TASKS: ResourceDescriptor = ResourceDescriptor::new("/tasks", Capabilities::ALL);
pub const TIME_ENTRIES: ResourceDescriptor =
    ResourceDescriptor::new("/time_entries", Capabilities::ALL);

impl<T: Transport> ApiClient<T> {
    pub fn bookings(&self) -> Resource<'_, T> {
        self.resource(BOOKINGS)
    }

    pub fn companies(&self) -> Resource<'_, T> {
        self.resource(COMPANIES)
    }

    pub fn deals(&self) -> Resource<'_, T> {
        self.resource(DEALS)
    }

    pub fn people(&self) -> Resource<'_, T> {
        self.resource(PEOPLE)
    }

    pub fn projects(&self) -> Resource<'_, T> {
        self.resource(PROJECTS)
    }

    pub fn services(&self) -> Resource<'_, T> {
        self.resource(SERVICES)
    }

    pub fn tasks(&self) -> Resource<'_, T> {
        self.resource(TASKS)
    }

    pub fn time_entries(&self) -> Resource<'_, T> {
        self.resource(TIME_ENTRIES)
    }
}
