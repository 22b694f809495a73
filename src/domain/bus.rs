//! Bus identity and RP2040 pin assignment
//!
//! The scanner drives two physical buses. `BusId` names them in reports;
//! `BusPins` describes which GPIOs a bus is wired to and checks the pair
//! against the RP2040 GPIO function table.

/// Which of the two scanned buses a report belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusId {
    /// Bus on the board's default I2C pins
    Primary,
    /// Bus on the fixed secondary pin pair
    Secondary,
}

impl BusId {
    /// Human-readable bus name
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusId::Primary => "Primary",
            BusId::Secondary => "Secondary",
        }
    }

    /// Section banner printed before the bus is scanned
    ///
    /// The dash runs differ in length between the two buses; keep them
    /// byte-exact, log scrapers match on them.
    pub const fn banner(&self) -> &'static str {
        match self {
            BusId::Primary => "---------- Scanning Primary I2C Bus -------------",
            BusId::Secondary => "---------- Scanning Secondary I2C Bus ------------",
        }
    }

    /// Both buses, in scan order
    pub const ALL: [BusId; 2] = [BusId::Primary, BusId::Secondary];
}

/// Number of user GPIOs on the RP2040 (GPIO0..=GPIO29)
pub const RP2040_GPIO_COUNT: u8 = 30;

/// RP2040 I2C controller instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cInstance {
    I2c0,
    I2c1,
}

/// Role a GPIO takes when muxed to its I2C function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    Sda,
    Scl,
}

/// I2C function of an RP2040 GPIO
///
/// The function table repeats every four pins: SDA0, SCL0, SDA1, SCL1.
pub const fn rp2040_i2c_function(gpio: u8) -> Option<(I2cInstance, PinRole)> {
    if gpio >= RP2040_GPIO_COUNT {
        return None;
    }
    let instance = if (gpio >> 1) & 1 == 0 {
        I2cInstance::I2c0
    } else {
        I2cInstance::I2c1
    };
    let role = if gpio & 1 == 0 { PinRole::Sda } else { PinRole::Scl };
    Some((instance, role))
}

/// GPIO pair a bus is wired to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPins {
    /// Data line GPIO
    pub sda: u8,
    /// Clock line GPIO
    pub scl: u8,
}

impl BusPins {
    /// Adafruit KB2040 STEMMA QT connector (I2C0)
    pub const KB2040_STEMMA_QT: Self = Self::new(12, 13);

    /// Adafruit KB2040 D2/D3 header pins (I2C1)
    pub const KB2040_D2_D3: Self = Self::new(2, 3);

    pub const fn new(sda: u8, scl: u8) -> Self {
        Self { sda, scl }
    }

    /// Controller this pair can be routed to, if any
    ///
    /// Both pins must belong to the same controller and take the SDA and
    /// SCL roles respectively.
    pub const fn instance(&self) -> Option<I2cInstance> {
        match (rp2040_i2c_function(self.sda), rp2040_i2c_function(self.scl)) {
            (
                Some((I2cInstance::I2c0, PinRole::Sda)),
                Some((I2cInstance::I2c0, PinRole::Scl)),
            ) => Some(I2cInstance::I2c0),
            (
                Some((I2cInstance::I2c1, PinRole::Sda)),
                Some((I2cInstance::I2c1, PinRole::Scl)),
            ) => Some(I2cInstance::I2c1),
            _ => None,
        }
    }

    /// Whether the pair maps to a hardware I2C controller
    pub const fn is_hardware_i2c(&self) -> bool {
        self.instance().is_some()
    }
}

/// Every valid hardware I2C pin pair on the RP2040
///
/// Pairs are yielded ordered by SCL pin, then SDA pin.
pub fn rp2040_pin_pairs() -> impl Iterator<Item = BusPins> {
    (0..RP2040_GPIO_COUNT).flat_map(|scl| {
        (0..RP2040_GPIO_COUNT)
            .map(move |sda| BusPins::new(sda, scl))
            .filter(BusPins::is_hardware_i2c)
    })
}
