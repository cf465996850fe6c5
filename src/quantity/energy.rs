quantity!(
    /// Forecasted electricity demand.
    KilowattHours, suffix: "kWh", precision: 1
);
