pub mod condition;
pub mod reading;

pub use condition::{Condition, FlareClass, GScale, RScale, SScale};
pub use reading::{
    ElectronFlux, KIndex, Magnetometer, ProtonFlux, SolarWind, SpaceWeatherReading, XrayFlux,
};
