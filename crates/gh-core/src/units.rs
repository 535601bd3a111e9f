// gh-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, HeatTransfer as UomHeatTransfer, Length as UomLength, Power as UomPower,
    Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type HeatTransferCoeff = UomHeatTransfer;
pub type Length = UomLength;
pub type Power = UomPower;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Volume = UomVolume;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn w_per_m2_k(v: f64) -> HeatTransferCoeff {
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;
    HeatTransferCoeff::new::<watt_per_square_meter_kelvin>(v)
}
