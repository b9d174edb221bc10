//! Packet dispatcher for the meter's radio link
//!
//! Routes each inbound frame to its handler and shapes every outcome into
//! the uniform wire responses: an echo-based success frame, the 2-byte
//! error frame, or nothing at all for empty input.

use crate::backend::params::{self, ParameterAction};
use crate::backend::traits::MeterBackend;
use crate::config::packet::PARAMETER_LEN;
use crate::packet::parser::PacketParser;
use crate::packet::types::{error_frame, ErrorCode, PacketType, Request, ResponseFrame};

/// Packet dispatcher
///
/// Stateless: the backend is borrowed per call, so independent instances
/// (and tests) run side by side without sharing anything.
pub struct PacketDispatcher {
    parser: PacketParser,
}

impl PacketDispatcher {
    /// Create a new packet dispatcher
    pub fn new() -> Self {
        Self {
            parser: PacketParser::new(),
        }
    }

    /// Process one inbound frame and produce the response to transmit
    ///
    /// Empty input yields an empty response, meaning "silently ignore".
    /// Any validation or backend failure yields the 2-byte error frame
    /// built from the raw input tag; a failure partway through a
    /// multi-parameter operation discards the partial response entirely.
    pub fn parse<B: MeterBackend>(&self, backend: &mut B, data: &[u8]) -> ResponseFrame {
        let Some(&tag) = data.first() else {
            return ResponseFrame::new();
        };

        let result = self.parser.parse(data).and_then(|request| {
            log::debug!("rx {:?}, {} bytes", request.packet_type(), data.len());
            self.dispatch(backend, request)
        });

        match result {
            Ok(mut response) => {
                // Success responses always carry the request tag, even when
                // a delegated handler filled the buffer
                if let Some(first) = response.first_mut() {
                    *first = tag;
                }
                response
            }
            Err(code) => {
                log::warn!("tag {:#04x} rejected: {:?}", tag, code);
                error_frame(tag, code)
            }
        }
    }

    /// Route a parsed request to its handler
    fn dispatch<B: MeterBackend>(
        &self,
        backend: &mut B,
        request: Request<'_>,
    ) -> Result<ResponseFrame, ErrorCode> {
        match request {
            Request::ReadMultiple { start, count } => {
                self.handle_read_multiple(backend, start, count)
            }
            Request::WriteMultiple { start, values } => {
                self.handle_write_multiple(backend, start, values)
            }
            Request::ReadSingle { address } => self.handle_read_single(backend, address),
            Request::WriteSingle { address, value } => {
                self.handle_write_single(backend, address, value)
            }
            Request::FirmwareUpdate { frame } => backend.firmware_frame(frame),
            Request::Control { frame } => backend.control_frame(frame),
        }
    }

    /// Handle ReadMultiple: echoed header, then one value per address
    fn handle_read_multiple<B: MeterBackend>(
        &self,
        backend: &mut B,
        start: u16,
        count: u16,
    ) -> Result<ResponseFrame, ErrorCode> {
        let mut response = Self::multi_header(PacketType::ReadMultiple, start, count);

        for i in 0..count {
            let mut chunk = [0u8; PARAMETER_LEN];
            params::transfer(
                backend,
                start.wrapping_add(i),
                ParameterAction::Read,
                &mut chunk,
            )?;
            response
                .extend_from_slice(&chunk)
                .map_err(|_| ErrorCode::InvalidLength)?;
        }

        Ok(response)
    }

    /// Handle WriteMultiple: values land in storage, the response is the
    /// header alone
    fn handle_write_multiple<B: MeterBackend>(
        &self,
        backend: &mut B,
        start: u16,
        values: &[u8],
    ) -> Result<ResponseFrame, ErrorCode> {
        for (i, value) in values.chunks_exact(PARAMETER_LEN).enumerate() {
            let mut chunk = [0u8; PARAMETER_LEN];
            chunk.copy_from_slice(value);
            params::transfer(
                backend,
                start.wrapping_add(i as u16),
                ParameterAction::Write,
                &mut chunk,
            )?;
        }

        let count = (values.len() / PARAMETER_LEN) as u16;
        Ok(Self::multi_header(PacketType::WriteMultiple, start, count))
    }

    /// Handle ReadSingle: echoed header plus the value
    fn handle_read_single<B: MeterBackend>(
        &self,
        backend: &mut B,
        address: u16,
    ) -> Result<ResponseFrame, ErrorCode> {
        let mut response = ResponseFrame::new();
        let _ = response.push(PacketType::ReadSingle as u8);
        let _ = response.extend_from_slice(&address.to_be_bytes());

        let mut chunk = [0u8; PARAMETER_LEN];
        params::transfer(backend, address, ParameterAction::Read, &mut chunk)?;
        let _ = response.extend_from_slice(&chunk);

        Ok(response)
    }

    /// Handle WriteSingle: the full request is mirrored back on success
    fn handle_write_single<B: MeterBackend>(
        &self,
        backend: &mut B,
        address: u16,
        value: i32,
    ) -> Result<ResponseFrame, ErrorCode> {
        let mut response = ResponseFrame::new();
        let _ = response.push(PacketType::WriteSingle as u8);
        let _ = response.extend_from_slice(&address.to_be_bytes());
        let _ = response.extend_from_slice(&value.to_be_bytes());

        // The echo doubles as the adapter's work buffer, so the write uses
        // exactly the mirrored bytes
        let mut chunk = value.to_be_bytes();
        params::transfer(backend, address, ParameterAction::Write, &mut chunk)?;

        Ok(response)
    }

    /// Echo of a multi-parameter request header
    fn multi_header(packet_type: PacketType, start: u16, count: u16) -> ResponseFrame {
        let mut response = ResponseFrame::new();
        let _ = response.push(packet_type as u8);
        let _ = response.extend_from_slice(&start.to_be_bytes());
        let _ = response.extend_from_slice(&count.to_be_bytes());
        response
    }
}

impl Default for PacketDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::traits::mock::MockBackend;
    use crate::config::packet::ERROR_FRAME_LEN;
    use heapless::Vec;

    /// Backend with both delegated services fitted
    ///
    /// Each service records the frame it was handed and answers with a
    /// canned response whose first byte is deliberately wrong, to prove
    /// the dispatcher stamps the tag.
    struct ServicedBackend {
        rom: MockBackend,
        firmware_seen: Vec<u8, 32>,
        control_seen: Vec<u8, 32>,
    }

    impl ServicedBackend {
        fn new() -> Self {
            Self {
                rom: MockBackend::new(),
                firmware_seen: Vec::new(),
                control_seen: Vec::new(),
            }
        }
    }

    impl MeterBackend for ServicedBackend {
        fn read_parameter(&mut self, address: u16) -> Result<i32, ErrorCode> {
            self.rom.read_parameter(address)
        }

        fn write_parameter(&mut self, address: u16, value: i32) -> Result<(), ErrorCode> {
            self.rom.write_parameter(address, value)
        }

        fn firmware_frame(&mut self, frame: &[u8]) -> Result<ResponseFrame, ErrorCode> {
            self.firmware_seen.clear();
            let _ = self.firmware_seen.extend_from_slice(frame);
            let mut response = ResponseFrame::new();
            let _ = response.extend_from_slice(&[0x00, 0xA5, 0x5A]);
            Ok(response)
        }

        fn control_frame(&mut self, frame: &[u8]) -> Result<ResponseFrame, ErrorCode> {
            self.control_seen.clear();
            let _ = self.control_seen.extend_from_slice(frame);
            let mut response = ResponseFrame::new();
            let _ = response.extend_from_slice(&[0x00, 0x99]);
            Ok(response)
        }
    }

    #[test]
    fn test_read_single_echoes_header_and_value() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        for address in [0u16, 10, 63, 100, 65000] {
            let [hi, lo] = address.to_be_bytes();
            let response = dispatcher.parse(&mut backend, &[0x07, hi, lo]);

            let value = i32::from(address).to_be_bytes();
            assert_eq!(
                response.as_slice(),
                &[0x07, hi, lo, value[0], value[1], value[2], value[3]]
            );
        }
    }

    #[test]
    fn test_read_single_bad_address() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();
        backend.reject_address(228, ErrorCode::InvalidAddress);

        let response = dispatcher.parse(&mut backend, &[0x07, 0x00, 228]);
        assert_eq!(response.as_slice(), &[0x47, 0x02]);
    }

    #[test]
    fn test_read_single_wrong_length() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[0x07, 0x00]);
        assert_eq!(response.len(), ERROR_FRAME_LEN);
        assert_eq!(response.as_slice(), &[0x47, 0x06]);

        // Malformed frames never reach storage
        assert!(backend.reads().is_empty());
    }

    #[test]
    fn test_write_single_echoes_request() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let frame = [0x06, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x2A];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &frame);
        assert_eq!(backend.writes(), &[(10, 42)]);
    }

    #[test]
    fn test_write_single_negative_value() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let frame = [0x06, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFE];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &frame);
        assert_eq!(backend.writes(), &[(1, -2)]);
    }

    #[test]
    fn test_write_single_rejected_value() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();
        backend.reject_value(228, ErrorCode::InvalidValue);

        let response = dispatcher.parse(&mut backend, &[0x06, 0x00, 0x01, 0x00, 0x00, 0x00, 228]);
        assert_eq!(response.as_slice(), &[0x46, 0x03]);
    }

    #[test]
    fn test_read_multiple_serves_ascending_run() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        // 20 parameters from address 100
        let response = dispatcher.parse(&mut backend, &[0x03, 0x00, 100, 0x00, 20]);

        assert_eq!(response.len(), 5 + 4 * 20);
        assert_eq!(&response[..5], &[0x03, 0x00, 100, 0x00, 20]);
        for i in 0..20u16 {
            let offset = 5 + 4 * i as usize;
            let expected = i32::from(100 + i).to_be_bytes();
            assert_eq!(&response[offset..offset + 4], &expected);
        }
    }

    #[test]
    fn test_read_multiple_zero_count() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[0x03, 0x00, 0x05, 0x00, 0x00]);
        assert_eq!(response.as_slice(), &[0x03, 0x00, 0x05, 0x00, 0x00]);
    }

    #[test]
    fn test_read_multiple_aborts_on_first_failure() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();
        backend.reject_address(105, ErrorCode::InvalidAddress);

        let response = dispatcher.parse(&mut backend, &[0x03, 0x00, 100, 0x00, 20]);

        // Partial progress is discarded, only the error frame goes out
        assert_eq!(response.as_slice(), &[0x43, 0x02]);
        assert_eq!(backend.reads(), &[100, 101, 102, 103, 104]);
    }

    #[test]
    fn test_read_multiple_over_capacity() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        // 31 parameters would need 129 bytes of response
        let response = dispatcher.parse(&mut backend, &[0x03, 0x00, 0x00, 0x00, 31]);
        assert_eq!(response.as_slice(), &[0x43, 0x06]);
        assert!(backend.reads().is_empty());
    }

    #[test]
    fn test_read_multiple_wraps_address_space() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[0x03, 0xFF, 0xFE, 0x00, 0x04]);

        assert_eq!(response.len(), 5 + 16);
        assert_eq!(backend.reads(), &[0xFFFE, 0xFFFF, 0x0000, 0x0001]);
    }

    #[test]
    fn test_write_multiple_response_is_header_only() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let frame = [
            0x10, 0x00, 0x05, 0x00, 0x02, // start 5, count 2
            0x00, 0x00, 0x00, 0x01, // value 1
            0xFF, 0xFF, 0xFF, 0xFF, // value -1
        ];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &frame[..5]);
        assert_eq!(backend.writes(), &[(5, 1), (6, -1)]);
    }

    #[test]
    fn test_write_multiple_aborts_on_first_failure() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();
        backend.reject_value(2, ErrorCode::ReadOnly);

        let frame = [
            0x10, 0x00, 0x05, 0x00, 0x03, // start 5, count 3
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x02, // poisoned
            0x00, 0x00, 0x00, 0x03, //
        ];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &[0x50, 0x05]);
        assert_eq!(backend.writes(), &[(5, 1)]);
    }

    #[test]
    fn test_write_multiple_length_mismatch() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        // Count says 2, only 1 value present
        let frame = [0x10, 0x00, 0x05, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &[0x50, 0x06]);
        assert!(backend.writes().is_empty());
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[]);
        assert!(response.is_empty());
    }

    #[test]
    fn test_unknown_tag() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[0xAB, 0x00, 0x00]);
        assert_eq!(response.as_slice(), &[0xEB, 0x01]);
    }

    #[test]
    fn test_delegated_tags_without_services() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        let response = dispatcher.parse(&mut backend, &[0x29, 0x01]);
        assert_eq!(response.as_slice(), &[0x69, 0x01]);

        let response = dispatcher.parse(&mut backend, &[0x27, 0, 0, 0, 0, 0, 0]);
        assert_eq!(response.as_slice(), &[0x67, 0x01]);
    }

    #[test]
    fn test_delegated_length_checked_before_service() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = MockBackend::new();

        // Bare tag is structurally short, whether or not a service is fitted
        let response = dispatcher.parse(&mut backend, &[0x29]);
        assert_eq!(response.as_slice(), &[0x69, 0x06]);

        let mut serviced = ServicedBackend::new();
        let response = dispatcher.parse(&mut serviced, &[0x29]);
        assert_eq!(response.as_slice(), &[0x69, 0x06]);
        assert!(serviced.firmware_seen.is_empty());

        let response = dispatcher.parse(&mut serviced, &[0x27, 0x01, 0x02]);
        assert_eq!(response.as_slice(), &[0x67, 0x06]);
        assert!(serviced.control_seen.is_empty());
    }

    #[test]
    fn test_firmware_frame_delegated_verbatim() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = ServicedBackend::new();

        let frame = [0x29, 0x01, 0xAA, 0xBB];
        let response = dispatcher.parse(&mut backend, &frame);

        // Canned response with its first byte stamped to the tag
        assert_eq!(response.as_slice(), &[0x29, 0xA5, 0x5A]);
        assert_eq!(backend.firmware_seen.as_slice(), &frame);
    }

    #[test]
    fn test_control_frame_delegated_verbatim() {
        let dispatcher = PacketDispatcher::new();
        let mut backend = ServicedBackend::new();

        let frame = [0x27, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let response = dispatcher.parse(&mut backend, &frame);

        assert_eq!(response.as_slice(), &[0x27, 0x99]);
        assert_eq!(backend.control_seen.as_slice(), &frame);
    }
}
