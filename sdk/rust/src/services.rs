//! One service per backend resource.
//!
//! Services borrow an [`ApiClient`] and map typed arguments onto an
//! [`Endpoint`]. They never validate, retry, or cache.

use serde::Serialize;

use crate::client::{ApiClient, ApiResponse};
use crate::endpoint::Endpoint;
use crate::error::ApiError;

type ApiResult = Result<ApiResponse, ApiError>;

/// Driver records.
#[derive(Debug, Clone, Copy)]
pub struct DriverService<'c> {
    api: &'c ApiClient,
}

impl<'c> DriverService<'c> {
    pub fn new(api: &'c ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_drivers(&self) -> ApiResult {
        self.api.call(Endpoint::GetAllDrivers).await
    }

    pub async fn get_driver_by_id(&self, id: &str) -> ApiResult {
        self.api.call(Endpoint::GetDriverById(id)).await
    }

    pub async fn create_driver<D: Serialize + ?Sized>(&self, driver: &D) -> ApiResult {
        self.api.send(Endpoint::CreateDriver, Some(driver)).await
    }

    pub async fn update_driver<D: Serialize + ?Sized>(&self, id: &str, driver: &D) -> ApiResult {
        self.api.send(Endpoint::UpdateDriver(id), Some(driver)).await
    }

    pub async fn delete_driver(&self, id: &str) -> ApiResult {
        self.api.call(Endpoint::DeleteDriver(id)).await
    }

    pub async fn search_drivers_by_name(&self, name: &str) -> ApiResult {
        self.api.call(Endpoint::SearchDriversByName(name)).await
    }

    pub async fn search_drivers_by_phone(&self, phone: &str) -> ApiResult {
        self.api.call(Endpoint::SearchDriversByPhone(phone)).await
    }

    pub async fn search_drivers_by_license(&self, license: &str) -> ApiResult {
        self.api.call(Endpoint::SearchDriversByLicense(license)).await
    }

    pub async fn search_drivers_by_vehicle(&self, vehicle_number: &str) -> ApiResult {
        self.api.call(Endpoint::SearchDriversByVehicle(vehicle_number)).await
    }

    /// Check whether `phone` is free. `exclude_driver_id` skips the driver
    /// being edited; an empty id counts as absent.
    pub async fn validate_phone_number(&self, phone: &str, exclude_driver_id: Option<&str>) -> ApiResult {
        self.api
            .call(Endpoint::ValidatePhoneNumber {
                phone,
                exclude_driver_id,
            })
            .await
    }
}

/// Vehicles and their driver assignments.
#[derive(Debug, Clone, Copy)]
pub struct VehicleService<'c> {
    api: &'c ApiClient,
}

impl<'c> VehicleService<'c> {
    pub fn new(api: &'c ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_vehicles(&self) -> ApiResult {
        self.api.call(Endpoint::GetAllVehicles).await
    }

    pub async fn get_vehicle_by_id(&self, id: &str) -> ApiResult {
        self.api.call(Endpoint::GetVehicleById(id)).await
    }

    pub async fn assign_vehicle_to_driver<V: Serialize + ?Sized>(&self, driver_id: &str, vehicle: &V) -> ApiResult {
        self.api
            .send(Endpoint::AssignVehicleToDriver(driver_id), Some(vehicle))
            .await
    }

    pub async fn delete_vehicle(&self, id: &str) -> ApiResult {
        self.api.call(Endpoint::DeleteVehicle(id)).await
    }
}

/// Fare rate applied by the autometer.
#[derive(Debug, Clone, Copy)]
pub struct FareRateService<'c> {
    api: &'c ApiClient,
}

impl<'c> FareRateService<'c> {
    pub fn new(api: &'c ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_current_rate(&self) -> ApiResult {
        self.api.call(Endpoint::GetCurrentRate).await
    }

    pub async fn update_rate(&self, new_rate: f64) -> ApiResult {
        self.api.call(Endpoint::UpdateRate(new_rate)).await
    }
}

/// Autometer ride records.
#[derive(Debug, Clone, Copy)]
pub struct RideFareService<'c> {
    api: &'c ApiClient,
}

impl<'c> RideFareService<'c> {
    pub fn new(api: &'c ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_recent_rides(&self) -> ApiResult {
        self.api.call(Endpoint::GetRecentRides).await
    }

    pub async fn get_rides_by_driver(&self, driver_id: &str) -> ApiResult {
        self.api.call(Endpoint::GetRidesByDriver(driver_id)).await
    }

    pub async fn submit_ride_data<R: Serialize + ?Sized>(&self, ride_data: &R) -> ApiResult {
        self.api.send(Endpoint::SubmitRideData, Some(ride_data)).await
    }
}

/// Driver emergency alerts.
#[derive(Debug, Clone, Copy)]
pub struct SosService<'c> {
    api: &'c ApiClient,
}

impl<'c> SosService<'c> {
    pub fn new(api: &'c ApiClient) -> Self {
        Self { api }
    }

    pub async fn send_sos_alert<A: Serialize + ?Sized>(&self, alert: &A) -> ApiResult {
        self.api.send(Endpoint::SendSosAlert, Some(alert)).await
    }

    pub async fn get_all_alerts(&self) -> ApiResult {
        self.api.call(Endpoint::GetAllAlerts).await
    }

    pub async fn get_active_alerts(&self) -> ApiResult {
        self.api.call(Endpoint::GetActiveAlerts).await
    }

    pub async fn acknowledge_alert(&self, alert_id: &str) -> ApiResult {
        self.api.call(Endpoint::AcknowledgeAlert(alert_id)).await
    }
}
