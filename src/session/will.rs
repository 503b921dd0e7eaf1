use std::fmt;

/// MQTT quality of service level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qos {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl TryFrom<u8> for Qos {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qos::AtMostOnce),
            1 => Ok(Qos::AtLeastOnce),
            2 => Ok(Qos::ExactlyOnce),
            other => Err(other),
        }
    }
}

impl From<Qos> for u8 {
    fn from(qos: Qos) -> Self {
        match qos {
            Qos::AtMostOnce => 0,
            Qos::AtLeastOnce => 1,
            Qos::ExactlyOnce => 2,
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Last will registered with the broker on connect
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WillOptions {
    pub flag: bool,
    pub topic: Option<String>,
    pub message: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

impl WillOptions {
    /// Topic to register, if the will is enabled and has one
    pub fn active_topic(&self) -> Option<&str> {
        if self.flag {
            self.topic.as_deref()
        } else {
            None
        }
    }
}
