use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use bytes::BytesMut;
use ethlink_frame::{
    decode_content, encode_frame, CaptureRecordHeader, EthernetHeader, MacAddr, Message,
    ETHERNET_HEADER_SIZE, ETHERTYPE, RECORD_HEADER_LEN,
};
use ethlink_transport::{resolve_hardware_address, CaptureDevice, FilterProgram, PlatformDevice};
use tracing::{debug, info, trace};

use crate::config::EthInterfaceConfig;
use crate::error::{IfaceError, Result};
use crate::sink::MessageSink;

/// Kernel filter installed on every capture device this adapter opens.
pub const CAPTURE_FILTER: FilterProgram = FilterProgram::ethertype(ETHERTYPE);

const INITIAL_SEND_CAPACITY: usize = 2048;

/// Counters kept by the dispatcher and the send path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfaceStats {
    /// Frames decoded and handed to the sink.
    pub delivered: u64,
    /// Frames dropped by validation.
    pub dropped: u64,
    /// Reads that failed or came back runt.
    pub read_errors: u64,
    /// Frames written whole.
    pub sent: u64,
    /// Writes that failed or came up short.
    pub write_errors: u64,
}

/// Link-layer tunnel adapter over one capture device.
///
/// Owns the device handle, the local hardware address and a single read
/// buffer sized to what the device can return in one read. Both the read
/// dispatcher and the send path run on the caller's thread; nothing here
/// blocks.
pub struct EthInterface<D> {
    device: D,
    interface: String,
    local_mac: MacAddr,
    read_buf: Box<[u8]>,
    send_buf: BytesMut,
    stats: IfaceStats,
}

impl EthInterface<PlatformDevice> {
    /// Resolve the interface's address, acquire a capture device, and bind it.
    pub fn open(config: &EthInterfaceConfig) -> Result<Self> {
        let local_mac = MacAddr::from(resolve_hardware_address(&config.interface)?);
        let device = PlatformDevice::open(
            &config.interface,
            &config.acquire,
            config.immediate,
            &CAPTURE_FILTER,
        )?;
        info!(interface = %config.interface, mac = %local_mac, "ethernet interface up");
        Ok(Self::with_device(device, &config.interface, local_mac))
    }
}

impl<D: CaptureDevice> EthInterface<D> {
    /// Wrap an already configured device.
    pub fn with_device(device: D, interface: &str, local_mac: MacAddr) -> Self {
        let buffer_len = device.buffer_len();
        debug!(interface, buffer_len, backend = device.backend_name(), "read buffer allocated");
        Self {
            device,
            interface: interface.to_string(),
            local_mac,
            read_buf: vec![0u8; buffer_len].into_boxed_slice(),
            send_buf: BytesMut::with_capacity(INITIAL_SEND_CAPACITY),
            stats: IfaceStats::default(),
        }
    }

    /// Drain one read from the device and deliver every valid frame in it.
    ///
    /// Call when the device signals readability. Returns how many messages
    /// reached `sink`. Read failures and malformed frames are logged and
    /// skipped; only buffer-walking inconsistencies return an error.
    pub fn handle_readable<S>(&mut self, sink: &mut S) -> Result<usize>
    where
        S: MessageSink + ?Sized,
    {
        match self.read_batch() {
            Ok(bytes) => self.dispatch(bytes, sink),
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                trace!(interface = %self.interface, "spurious wakeup");
                Ok(0)
            }
            Err(err) => {
                self.record_read_error(&err);
                Ok(0)
            }
        }
    }

    pub(crate) fn record_read_error(&mut self, err: &std::io::Error) {
        self.stats.read_errors += 1;
        debug!(interface = %self.interface, error = %err, "read from capture device failed");
    }

    pub(crate) fn read_batch(&mut self) -> std::io::Result<usize> {
        loop {
            match self.device.read(&mut self.read_buf) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    /// Walk the capture records in the first `bytes` bytes of the read buffer.
    pub(crate) fn dispatch<S>(&mut self, bytes: usize, sink: &mut S) -> Result<usize>
    where
        S: MessageSink + ?Sized,
    {
        if bytes == 0 {
            return Ok(0);
        }
        if bytes < RECORD_HEADER_LEN {
            self.stats.read_errors += 1;
            debug!(interface = %self.interface, bytes, "runt read");
            return Ok(0);
        }

        let buffer = &self.read_buf[..bytes];
        let mut delivered = 0usize;
        let mut offset = 0usize;

        while offset < bytes {
            let record = CaptureRecordHeader::parse(&buffer[offset..]).ok_or(
                IfaceError::RecordOverrun {
                    offset,
                    end: offset + RECORD_HEADER_LEN,
                    read: bytes,
                },
            )?;
            let frame_start = offset + record.header_len as usize;
            let frame_end = frame_start + record.captured_len as usize;
            if (record.header_len as usize) < RECORD_HEADER_LEN || frame_end > bytes {
                return Err(IfaceError::RecordOverrun {
                    offset,
                    end: frame_end,
                    read: bytes,
                });
            }

            let frame = &buffer[frame_start..frame_end];
            let envelope = EthernetHeader::parse(frame).ok_or(IfaceError::TruncatedEnvelope {
                offset,
                len: frame.len(),
            })?;
            if envelope.ethertype != ETHERTYPE {
                return Err(IfaceError::UnexpectedEthertype {
                    offset,
                    ethertype: envelope.ethertype,
                });
            }

            match decode_content(&envelope, &frame[ETHERNET_HEADER_SIZE..]) {
                Ok(decoded) => {
                    let message = Message::with_descriptor(&decoded.descriptor(), decoded.payload);
                    sink.deliver(message);
                    delivered += 1;
                    self.stats.delivered += 1;
                }
                Err(reason) => {
                    self.stats.dropped += 1;
                    debug!(
                        interface = %self.interface,
                        source = %envelope.source,
                        %reason,
                        "DROP"
                    );
                }
            }

            offset += record.stride();
        }

        Ok(delivered)
    }

    /// Frame and transmit one message.
    ///
    /// `message` must start with an address descriptor naming the
    /// destination. A failed or short write is logged and counted, not
    /// returned: the mesh above tolerates loss.
    pub fn send(&mut self, mut message: Message) -> Result<()> {
        let destination = message.pop_descriptor()?;

        self.send_buf.clear();
        encode_frame(
            self.local_mac,
            &destination,
            message.bytes(),
            &mut self.send_buf,
        )?;

        let expected = self.send_buf.len();
        let written = loop {
            match self.device.write(&self.send_buf) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match written {
            Ok(n) if n == expected => self.stats.sent += 1,
            Ok(n) => {
                self.stats.write_errors += 1;
                debug!(interface = %self.interface, written = n, expected, "short write to capture device");
            }
            Err(err) => {
                self.stats.write_errors += 1;
                debug!(interface = %self.interface, error = %err, "error writing to capture device");
            }
        }
        Ok(())
    }

    /// Name of the bound interface.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Hardware address frames are sent from.
    pub fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    /// Capacity of the read buffer.
    pub fn buffer_len(&self) -> usize {
        self.read_buf.len()
    }

    pub fn stats(&self) -> IfaceStats {
        self.stats
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }
}

impl<D: CaptureDevice + AsRawFd> EthInterface<D> {
    /// Wait up to `timeout` for the device to become readable.
    ///
    /// `None` waits indefinitely. Returns `false` on timeout or when the
    /// wait was interrupted by a signal.
    pub fn poll_readable(&self, timeout: Option<Duration>) -> Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = match timeout {
            Some(timeout) => timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
            None => -1,
        };

        // SAFETY: `pollfd` is a single valid entry for the duration of the call.
        let rc = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(IfaceError::Io(err));
        }
        Ok(rc > 0 && pollfd.revents & (libc::POLLIN | libc::POLLERR | libc::POLLHUP) != 0)
    }
}

impl<D: AsRawFd> AsRawFd for EthInterface<D> {
    fn as_raw_fd(&self) -> RawFd {
        self.device.as_raw_fd()
    }
}

impl<D> std::fmt::Debug for EthInterface<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthInterface")
            .field("interface", &self.interface)
            .field("local_mac", &self.local_mac)
            .field("buffer_len", &self.read_buf.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::os::unix::net::UnixDatagram;

    use ethlink_frame::{
        decode_frame, write_record, AddressDescriptor, FrameError, CURRENT_VERSION, HEADER_SIZE,
    };

    use super::*;

    const LOCAL: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    const PEER_A: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0xa0]);
    const PEER_B: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0xb0]);

    struct FakeDevice {
        reads: VecDeque<io::Result<Vec<u8>>>,
        written: Vec<Vec<u8>>,
        write_limit: Option<usize>,
        write_error: Option<ErrorKind>,
        buffer_len: usize,
        largest_read: usize,
    }

    impl FakeDevice {
        fn new(buffer_len: usize) -> Self {
            Self {
                reads: VecDeque::new(),
                written: Vec::new(),
                write_limit: None,
                write_error: None,
                buffer_len,
                largest_read: 0,
            }
        }

        fn with_read(mut self, data: Vec<u8>) -> Self {
            self.reads.push_back(Ok(data));
            self
        }

        fn with_read_error(mut self, kind: ErrorKind) -> Self {
            self.reads.push_back(Err(io::Error::from(kind)));
            self
        }
    }

    impl Read for FakeDevice {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.largest_read = self.largest_read.max(buf.len());
            match self.reads.pop_front() {
                Some(Ok(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
                Some(Err(err)) => Err(err),
                None => Err(io::Error::from(ErrorKind::WouldBlock)),
            }
        }
    }

    impl Write for FakeDevice {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Some(kind) = self.write_error {
                return Err(io::Error::from(kind));
            }
            let n = self.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
            self.written.push(buf[..n].to_vec());
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CaptureDevice for FakeDevice {
        fn buffer_len(&self) -> usize {
            self.buffer_len
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    /// Datagram-backed device: one datagram per read batch, with a real fd.
    struct DatagramDevice(UnixDatagram);

    impl Read for DatagramDevice {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.recv(buf)
        }
    }

    impl Write for DatagramDevice {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.send(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl AsRawFd for DatagramDevice {
        fn as_raw_fd(&self) -> RawFd {
            self.0.as_raw_fd()
        }
    }

    impl CaptureDevice for DatagramDevice {
        fn buffer_len(&self) -> usize {
            4096
        }

        fn backend_name(&self) -> &'static str {
            "datagram"
        }
    }

    fn frame(source: MacAddr, destination: &AddressDescriptor, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(source, destination, payload, &mut buf).unwrap();
        buf.to_vec()
    }

    fn batch(frames: &[Vec<u8>]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for frame in frames {
            write_record(frame, &mut buf);
        }
        buf.to_vec()
    }

    fn delivered(messages: Vec<Message>) -> Vec<(AddressDescriptor, Vec<u8>)> {
        messages
            .into_iter()
            .map(|mut msg| {
                let desc = msg.pop_descriptor().unwrap();
                (desc, msg.bytes().to_vec())
            })
            .collect()
    }

    #[test]
    fn delivers_every_record_of_a_batch_in_order() {
        let to_us = AddressDescriptor::unicast(LOCAL);
        let frames = vec![
            frame(PEER_A, &to_us, b"a"),
            frame(PEER_B, &to_us, b"second payload"),
            frame(PEER_A, &to_us, &[0x42; 301]),
        ];
        let wire = batch(&frames);
        let device = FakeDevice::new(4096).with_read(wire);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        let count = iface.handle_readable(&mut sink).unwrap();

        assert_eq!(count, 3);
        let got = delivered(sink);
        assert_eq!(got[0], (AddressDescriptor::unicast(PEER_A), b"a".to_vec()));
        assert_eq!(
            got[1],
            (AddressDescriptor::unicast(PEER_B), b"second payload".to_vec())
        );
        assert_eq!(got[2], (AddressDescriptor::unicast(PEER_A), vec![0x42; 301]));
        assert_eq!(iface.stats().delivered, 3);
        assert_eq!(iface.stats().dropped, 0);
    }

    #[test]
    fn broadcast_destination_sets_descriptor_flag() {
        let frames = vec![
            frame(PEER_A, &AddressDescriptor::broadcast(), b"to everyone"),
            frame(PEER_B, &AddressDescriptor::unicast(LOCAL), b"to you"),
        ];
        let device = FakeDevice::new(4096).with_read(batch(&frames));
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        iface.handle_readable(&mut sink).unwrap();
        let got = delivered(sink);

        assert_eq!(
            got[0].0,
            AddressDescriptor {
                mac: PEER_A,
                broadcast: true
            }
        );
        assert_eq!(got[1].0, AddressDescriptor::unicast(PEER_B));
    }

    #[test]
    fn malformed_frames_are_dropped_without_stopping_the_walk() {
        let to_us = AddressDescriptor::unicast(LOCAL);
        let good = frame(PEER_A, &to_us, b"keep me");

        let mut bad_magic = frame(PEER_A, &to_us, b"magic");
        bad_magic[ETHERNET_HEADER_SIZE + 5] = 0x01;

        let mut bad_version = frame(PEER_A, &to_us, b"version");
        bad_version[ETHERNET_HEADER_SIZE] = CURRENT_VERSION + 1;

        let mut oversized = frame(PEER_A, &to_us, b"size");
        let declared = (HEADER_SIZE + 200) as u16;
        oversized[ETHERNET_HEADER_SIZE + 2..ETHERNET_HEADER_SIZE + 4]
            .copy_from_slice(&declared.to_be_bytes());

        let mut runt = frame(PEER_A, &to_us, b"");
        runt.truncate(ETHERNET_HEADER_SIZE + 3);

        let frames = vec![
            good.clone(),
            bad_magic,
            bad_version,
            oversized,
            runt,
            good,
        ];
        let device = FakeDevice::new(8192).with_read(batch(&frames));
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        let count = iface.handle_readable(&mut sink).unwrap();

        assert_eq!(count, 2);
        for (_, payload) in delivered(sink) {
            assert_eq!(payload, b"keep me");
        }
        assert_eq!(iface.stats().dropped, 4);
        assert_eq!(iface.stats().delivered, 2);
    }

    #[test]
    fn trailing_padding_is_trimmed_to_declared_length() {
        let mut padded = frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"hi");
        padded.resize(60, 0);
        let device = FakeDevice::new(4096).with_read(batch(&[padded]));
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        iface.handle_readable(&mut sink).unwrap();
        assert_eq!(delivered(sink)[0].1, b"hi");
    }

    #[test]
    fn read_errors_are_logged_not_returned() {
        let device = FakeDevice::new(4096)
            .with_read_error(ErrorKind::Other)
            .with_read_error(ErrorKind::WouldBlock);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 0);
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 0);
        assert!(sink.is_empty());
        assert_eq!(iface.stats().read_errors, 1);
    }

    #[test]
    fn interrupted_read_is_retried() {
        let wire = batch(&[frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"x")]);
        let device = FakeDevice::new(4096)
            .with_read_error(ErrorKind::Interrupted)
            .with_read(wire);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 1);
    }

    #[test]
    fn empty_and_runt_reads_deliver_nothing() {
        let device = FakeDevice::new(4096)
            .with_read(Vec::new())
            .with_read(vec![0u8; RECORD_HEADER_LEN - 1]);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 0);
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 0);
        assert!(sink.is_empty());
        assert_eq!(iface.stats().read_errors, 1);
    }

    #[test]
    fn read_is_bounded_by_device_buffer_len() {
        let device = FakeDevice::new(256);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);
        assert_eq!(iface.buffer_len(), 256);

        let mut sink = Vec::new();
        iface.handle_readable(&mut sink).unwrap();
        assert_eq!(iface.device().largest_read, 256);
    }

    // A foreign ethertype means the kernel filter or the record walk is broken.
    #[test]
    fn foreign_ethertype_is_an_invariant_violation_not_a_drop() {
        let good = frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"before");
        let mut foreign = frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"ipv4?");
        foreign[12..14].copy_from_slice(&0x0800u16.to_be_bytes());

        let device = FakeDevice::new(4096).with_read(batch(&[good, foreign]));
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        let err = iface.handle_readable(&mut sink).unwrap_err();

        assert!(matches!(
            err,
            IfaceError::UnexpectedEthertype {
                ethertype: 0x0800,
                ..
            }
        ));
        assert_eq!(sink.len(), 1, "records before the fault are still delivered");
        assert_eq!(iface.stats().dropped, 0);
    }

    #[test]
    fn record_running_past_read_is_an_invariant_violation() {
        let mut wire = batch(&[frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"cut")]);
        let mut header = CaptureRecordHeader::parse(&wire).unwrap();
        header.captured_len += 64;
        let mut rewritten = BytesMut::new();
        header.write(&mut rewritten);
        wire[..RECORD_HEADER_LEN].copy_from_slice(&rewritten);

        let device = FakeDevice::new(4096).with_read(wire);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        let err = iface.handle_readable(&mut sink).unwrap_err();
        assert!(matches!(err, IfaceError::RecordOverrun { offset: 0, .. }));
        assert!(sink.is_empty());
    }

    #[test]
    fn record_too_short_for_envelope_is_an_invariant_violation() {
        let mut buf = BytesMut::new();
        write_record(&[0u8; 10], &mut buf);
        let device = FakeDevice::new(4096).with_read(buf.to_vec());
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let mut sink = Vec::new();
        let err = iface.handle_readable(&mut sink).unwrap_err();
        assert!(matches!(err, IfaceError::TruncatedEnvelope { len: 10, .. }));
    }

    #[test]
    fn send_writes_one_encoded_frame() {
        let device = FakeDevice::new(4096);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let msg = Message::with_descriptor(&AddressDescriptor::unicast(PEER_A), b"outbound");
        iface.send(msg).unwrap();

        let written = &iface.device().written;
        assert_eq!(written.len(), 1);
        let wire = &written[0];
        assert_eq!(&wire[0..6], &PEER_A.0);
        let decoded = decode_frame(wire).unwrap();
        assert_eq!(decoded.source, LOCAL);
        assert_eq!(decoded.payload, b"outbound");
        assert_eq!(iface.stats().sent, 1);
    }

    #[test]
    fn send_broadcast_flag_overrides_mac() {
        let device = FakeDevice::new(4096);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let desc = AddressDescriptor {
            mac: PEER_B,
            broadcast: true,
        };
        iface.send(Message::with_descriptor(&desc, b"hello")).unwrap();
        assert_eq!(&iface.device().written[0][0..6], &[0xff; 6]);
    }

    #[test]
    fn short_write_is_counted_not_returned() {
        let mut device = FakeDevice::new(4096);
        device.write_limit = Some(10);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let msg = Message::with_descriptor(&AddressDescriptor::unicast(PEER_A), b"truncated");
        assert!(iface.send(msg).is_ok());
        assert_eq!(iface.stats().write_errors, 1);
        assert_eq!(iface.stats().sent, 0);
    }

    #[test]
    fn write_error_is_counted_not_returned() {
        let mut device = FakeDevice::new(4096);
        device.write_error = Some(ErrorKind::Other);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let msg = Message::with_descriptor(&AddressDescriptor::broadcast(), b"lost");
        assert!(iface.send(msg).is_ok());
        assert_eq!(iface.stats().write_errors, 1);
    }

    #[test]
    fn send_without_descriptor_is_rejected() {
        let device = FakeDevice::new(4096);
        let mut iface = EthInterface::with_device(device, "test0", LOCAL);

        let err = iface.send(Message::new(b"raw")).unwrap_err();
        assert!(matches!(
            err,
            IfaceError::Frame(FrameError::BadAddress { .. })
        ));
        assert!(iface.device().written.is_empty());
    }

    #[test]
    fn frames_sent_by_one_adapter_decode_on_another() {
        let mut sender = EthInterface::with_device(FakeDevice::new(4096), "a0", PEER_A);
        sender
            .send(Message::with_descriptor(
                &AddressDescriptor::unicast(LOCAL),
                b"unicast hop",
            ))
            .unwrap();
        sender
            .send(Message::with_descriptor(
                &AddressDescriptor::broadcast(),
                b"beacon",
            ))
            .unwrap();

        let wire = batch(&sender.into_device().written);
        let mut receiver =
            EthInterface::with_device(FakeDevice::new(4096).with_read(wire), "b0", LOCAL);

        let mut sink = Vec::new();
        receiver.handle_readable(&mut sink).unwrap();
        let got = delivered(sink);

        assert_eq!(
            got,
            vec![
                (AddressDescriptor::unicast(PEER_A), b"unicast hop".to_vec()),
                (
                    AddressDescriptor {
                        mac: PEER_A,
                        broadcast: true
                    },
                    b"beacon".to_vec()
                ),
            ]
        );
    }

    #[test]
    fn closure_sink_receives_messages() {
        let wire = batch(&[frame(PEER_A, &AddressDescriptor::unicast(LOCAL), b"cb")]);
        let mut iface =
            EthInterface::with_device(FakeDevice::new(4096).with_read(wire), "test0", LOCAL);

        let mut sizes = Vec::new();
        iface
            .handle_readable(&mut |msg: Message| sizes.push(msg.len()))
            .unwrap();
        assert_eq!(sizes, vec![ethlink_frame::DESCRIPTOR_SIZE + 2]);
    }

    #[test]
    fn poll_readable_tracks_pending_data() {
        let (ours, theirs) = UnixDatagram::pair().unwrap();
        ours.set_nonblocking(true).unwrap();
        let mut iface = EthInterface::with_device(DatagramDevice(ours), "dgram0", LOCAL);

        assert!(!iface.poll_readable(Some(Duration::from_millis(10))).unwrap());

        let wire = batch(&[frame(PEER_B, &AddressDescriptor::unicast(LOCAL), b"ready")]);
        theirs.send(&wire).unwrap();

        assert!(iface.poll_readable(Some(Duration::from_millis(500))).unwrap());
        let mut sink = Vec::new();
        assert_eq!(iface.handle_readable(&mut sink).unwrap(), 1);
        assert!(!iface.poll_readable(Some(Duration::from_millis(10))).unwrap());
    }
}
