pub mod bookings;

use std::sync::Arc;

use clinic_kernel::{settings::Settings, ModuleRegistry};

use bookings::store::BookingStore;

/// Register every module with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings, store: Arc<dyn BookingStore>) {
    registry.register(bookings::create_module(store, &settings.bookings));
}
