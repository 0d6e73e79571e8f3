//! Static descriptors for every backend operation.
//!
//! Each variant fixes the HTTP verb and the path template. Only the bound
//! path segments and query parameters vary from call to call.

use reqwest::Method;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint<'a> {
    // Drivers
    GetAllDrivers,
    GetDriverById(&'a str),
    CreateDriver,
    UpdateDriver(&'a str),
    DeleteDriver(&'a str),
    SearchDriversByName(&'a str),
    SearchDriversByPhone(&'a str),
    SearchDriversByLicense(&'a str),
    SearchDriversByVehicle(&'a str),
    ValidatePhoneNumber {
        phone: &'a str,
        exclude_driver_id: Option<&'a str>,
    },

    // Vehicles
    GetAllVehicles,
    GetVehicleById(&'a str),
    AssignVehicleToDriver(&'a str),
    DeleteVehicle(&'a str),

    // Fare rate
    GetCurrentRate,
    UpdateRate(f64),

    // Ride fare data
    GetRecentRides,
    GetRidesByDriver(&'a str),
    SubmitRideData,

    // SOS
    SendSosAlert,
    GetAllAlerts,
    GetActiveAlerts,
    AcknowledgeAlert(&'a str),
}

impl<'a> Endpoint<'a> {
    pub fn method(&self) -> Method {
        use Endpoint::*;
        match self {
            CreateDriver | AssignVehicleToDriver(_) | UpdateRate(_) | SubmitRideData
            | SendSosAlert => Method::POST,
            UpdateDriver(_) | AcknowledgeAlert(_) => Method::PUT,
            DeleteDriver(_) | DeleteVehicle(_) => Method::DELETE,
            _ => Method::GET,
        }
    }

    /// Path segments below the API base.
    pub fn segments(&self) -> Vec<&'a str> {
        use Endpoint::*;
        match *self {
            GetAllDrivers | CreateDriver => vec!["drivers"],
            GetDriverById(id) | UpdateDriver(id) | DeleteDriver(id) => vec!["drivers", id],
            SearchDriversByName(_) => vec!["drivers", "search", "name"],
            SearchDriversByPhone(_) => vec!["drivers", "search", "phone"],
            SearchDriversByLicense(_) => vec!["drivers", "search", "license"],
            SearchDriversByVehicle(_) => vec!["drivers", "search", "vehicle"],
            ValidatePhoneNumber { .. } => vec!["drivers", "validate", "phone"],
            GetAllVehicles => vec!["vehicles"],
            GetVehicleById(id) | DeleteVehicle(id) => vec!["vehicles", id],
            AssignVehicleToDriver(driver_id) => vec!["vehicles", "assign", driver_id],
            GetCurrentRate => vec!["fare", "get"],
            UpdateRate(_) => vec!["fare", "change"],
            GetRecentRides => vec!["fares", "autometer", "recent"],
            GetRidesByDriver(driver_id) => vec!["fares", "autometer", "driver", driver_id],
            SubmitRideData => vec!["fares", "autometer"],
            SendSosAlert => vec!["sos", "alert"],
            GetAllAlerts => vec!["sos", "alerts"],
            GetActiveAlerts => vec!["sos", "alerts", "active"],
            AcknowledgeAlert(id) => vec!["sos", "alerts", id, "acknowledge"],
        }
    }

    /// Query parameters, in order.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        use Endpoint::*;
        match *self {
            SearchDriversByName(name) => vec![("driverName", name.to_string())],
            SearchDriversByPhone(phone) => vec![("driverPhone", phone.to_string())],
            SearchDriversByLicense(license) => vec![("licenseNumber", license.to_string())],
            SearchDriversByVehicle(number) => vec![("vehicleNumber", number.to_string())],
            ValidatePhoneNumber {
                phone,
                exclude_driver_id,
            } => {
                let mut params = vec![("phone", phone.to_string())];
                if let Some(id) = exclude_driver_id.filter(|id| !id.is_empty()) {
                    params.push(("excludeDriverId", id.to_string()));
                }
                params
            }
            UpdateRate(rate) => vec![("newRate", rate.to_string())],
            _ => Vec::new(),
        }
    }

    /// Full request URL for this call, below `base`.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(self.segments());
        }
        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }
}
