quantity!(
    /// Forecasted wholesale price per megawatt-hour.
    MegawattHourPrice, suffix: "₹/MWh", precision: 2
);

impl MegawattHourPrice {
    /// Round to whole paise, half away from zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}
