use log::{debug, warn};
use std::io;
use std::iter;
use std::net::SocketAddr;
use std::time::Duration;
use stun_classic::header::MessageType;
use stun_classic::message::Message;
use stun_classic::util::print_bytes;
use tokio::time::Instant;

use crate::error::ProbeError;
use crate::transport::Transport;

pub const MAX_RETRANSMIT: usize = 9;
pub const DEFAULT_RTO: Duration = Duration::from_millis(100);
pub const MAX_RTO: Duration = Duration::from_millis(1600);

// udp 最大 64k
pub const MAX_PACKET_SIZE: usize = 64 * 1024;

/// Rfc 3489 9.3: start at 100ms, double each retransmit up to 1.6s,
/// stop after 9 requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetransmitPolicy {
    pub max_attempts: usize,
    pub initial_rto: Duration,
    pub max_rto: Duration,
}

impl Default for RetransmitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRANSMIT,
            initial_rto: DEFAULT_RTO,
            max_rto: MAX_RTO,
        }
    }
}

impl RetransmitPolicy {
    /// Read window of every attempt, in order.
    pub fn timeouts(&self) -> impl Iterator<Item = Duration> {
        let max_rto = self.max_rto;
        iter::successors(Some(self.initial_rto), |v| Some(v.saturating_mul(2)))
            .map(move |v| v.min(max_rto))
            .take(self.max_attempts)
    }
}

/// Sends `request` to `dst` and waits for a reply carrying the same
/// transaction id that `accept` agrees with.
///
/// Datagrams that don't decode, belong to another transaction, are not a
/// binding response or are refused by `accept` are dropped and the read
/// continues until the current window closes. `Ok(None)` means every
/// attempt went unanswered.
pub async fn send_and_wait<T, F>(
    transport: &mut T,
    policy: &RetransmitPolicy,
    request: &Message,
    dst: SocketAddr,
    mut accept: F,
) -> Result<Option<Message>, ProbeError>
where
    T: Transport,
    F: FnMut(&Message) -> bool,
{
    let data = request.pack();
    let mut recv_buf = vec![0u8; MAX_PACKET_SIZE];

    for (attempt, rto) in policy.timeouts().enumerate() {
        let sent = transport.send_to(&data, dst).await?;
        if sent != data.len() {
            return Err(ProbeError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write to {}, {} < {}", dst, sent, data.len()),
            )));
        }
        debug!(
            "--> {}, attempt: {}, wait: {:?}\n{}",
            dst,
            attempt + 1,
            rto,
            print_bytes(&data, " ", 8)
        );

        let deadline = Instant::now() + rto;
        while let Some((len, remote_addr)) = transport.recv_from(&mut recv_buf, deadline).await? {
            let buf = &recv_buf[..len];
            debug!("<-- {}, len: {}\n{}", remote_addr, len, print_bytes(buf, " ", 8));

            let mut reply = match Message::unpack(buf) {
                Ok(v) => v,
                Err(e) => {
                    warn!("discard datagram from {}, {}", remote_addr, e);
                    continue;
                }
            };

            // 不是这次请求的响应, 继续等
            if reply.trans_id() != request.trans_id() {
                debug!("discard datagram from {}, trans_id mismatch", remote_addr);
                continue;
            }

            match reply.msg_type() {
                MessageType::BindingResponse => {}
                MessageType::BindingErrorResponse => {
                    match reply.error_code() {
                        Some(e) => warn!("error response from {}, {} {}", remote_addr, e.code, e.msg),
                        None => warn!("error response from {} without error code", remote_addr),
                    }
                    continue;
                }
                v => {
                    debug!("discard {:?} from {}", v, remote_addr);
                    continue;
                }
            }

            reply.origin = Some(remote_addr);
            if !accept(&reply) {
                continue;
            }

            return Ok(Some(reply));
        }

        debug!("attempt {} to {} timed out", attempt + 1, dst);
    }

    Ok(None)
}
