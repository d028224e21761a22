use super::error::TelemetryError;

/// Bounds-checked little-endian reads over a command payload.
pub struct TelemetryReader<'a> {
    payload: &'a [u8],
}

impl<'a> TelemetryReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), TelemetryError> {
        if self.payload.len() < needed {
            return Err(TelemetryError::InsufficientPayload {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, TelemetryError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(TelemetryError::InsufficientPayload {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, TelemetryError> {
        let bytes = self.read_exact::<2>(range)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u24_le(&self, range: std::ops::Range<usize>) -> Result<u32, TelemetryError> {
        let [b0, b1, b2] = self.read_exact::<3>(range)?;
        Ok(u32::from_le_bytes([b0, b1, b2, 0]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], TelemetryError> {
        self.payload
            .get(range.clone())
            .ok_or(TelemetryError::InsufficientPayload {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    fn read_exact<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], TelemetryError> {
        let bytes = self.read_slice(range)?;
        bytes
            .try_into()
            .map_err(|_| TelemetryError::InsufficientPayload {
                needed: N,
                actual: bytes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::TelemetryReader;
    use crate::protocol::telemetry::TelemetryError;

    #[test]
    fn reads_little_endian_widths() {
        let payload = [0x01, 0x02, 0x03, 0x04];
        let reader = TelemetryReader::new(&payload);
        assert_eq!(reader.read_u8(3).unwrap(), 0x04);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0x0201);
        assert_eq!(reader.read_u24_le(1..4).unwrap(), 0x040302);
    }

    #[test]
    fn out_of_range_read_is_an_error() {
        let payload = [0x01, 0x02];
        let reader = TelemetryReader::new(&payload);
        assert_eq!(
            reader.read_u24_le(0..3).unwrap_err(),
            TelemetryError::InsufficientPayload {
                needed: 3,
                actual: 2,
            }
        );
        assert!(reader.read_u8(2).is_err());
    }

    #[test]
    fn mismatched_range_width_is_an_error() {
        let payload = [0u8; 4];
        let reader = TelemetryReader::new(&payload);
        assert!(matches!(
            reader.read_u16_le(0..3),
            Err(TelemetryError::InsufficientPayload { needed: 2, .. })
        ));
    }
}
