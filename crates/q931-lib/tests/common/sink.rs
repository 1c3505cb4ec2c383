use std::cell::RefCell;
use std::rc::Rc;

use q931_lib::{ConnectStatus, DlcId, Q931Transport, TransportErr};

/// Everything the stack handed to the link layer, in order
#[derive(Debug, Default)]
pub struct SinkLog {
    pub frames: Vec<(DlcId, Vec<u8>)>,
    pub connects: Vec<DlcId>,
    pub disconnects: Vec<DlcId>,
}

/// A link layer for testing purposes.
/// Links come up immediately unless constructed with `pending`, in which case the test
/// reports establishment through `Q931Lib::dlc_established`.
pub struct Sink {
    log: Rc<RefCell<SinkLog>>,
    connect_status: ConnectStatus,
}

impl Sink {
    pub fn new(log: Rc<RefCell<SinkLog>>) -> Self {
        Self { log, connect_status: ConnectStatus::Connected }
    }

    pub fn pending(log: Rc<RefCell<SinkLog>>) -> Self {
        Self { log, connect_status: ConnectStatus::Pending }
    }
}

impl Q931Transport for Sink {
    fn send_frame(&mut self, dlc: DlcId, frame: &[u8]) -> Result<(), TransportErr> {
        tracing::trace!("sink {} <- {}", dlc, hex::encode(frame));
        self.log.borrow_mut().frames.push((dlc, frame.to_vec()));
        Ok(())
    }

    fn connect(&mut self, dlc: DlcId) -> Result<ConnectStatus, TransportErr> {
        self.log.borrow_mut().connects.push(dlc);
        Ok(self.connect_status)
    }

    fn disconnect(&mut self, dlc: DlcId) -> Result<(), TransportErr> {
        self.log.borrow_mut().disconnects.push(dlc);
        Ok(())
    }
}
