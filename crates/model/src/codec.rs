//! CBOR conversions for records crossing the actor boundary.

use bytes::Bytes;

use crate::Error;

macro_rules! impl_cbor_bytes {
    ($($name:ty),+ $(,)?) => {
        $(
            impl TryFrom<Bytes> for $name {
                type Error = Error;

                fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
                    let reader = bytes.as_ref();
                    Ok(ciborium::de::from_reader(reader)?)
                }
            }

            impl TryInto<Bytes> for $name {
                type Error = Error;

                fn try_into(self) -> Result<Bytes, Self::Error> {
                    let mut writer = Vec::new();
                    ciborium::ser::into_writer(&self, &mut writer)?;
                    Ok(Bytes::from(writer))
                }
            }
        )+
    };
}

impl_cbor_bytes!(
    crate::UserProfile,
    crate::Gig,
    crate::Slot,
    crate::UsageEvent,
);
