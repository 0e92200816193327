#![allow(dead_code)]

use bytes::Bytes;
use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use nat_detect::transport::Transport;
use stun_classic::attrs::address_attr::AddressAttr;
use stun_classic::attrs::change_request::ChangeRequest;
use stun_classic::attrs::errcode_attr::ErrcodeAttr;
use stun_classic::attrs::{AttrType, RawAttr};
use stun_classic::header::MessageType;
use stun_classic::message::Message;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub fn addr(s: &str) -> SocketAddr {
    s.parse().expect("unable to parse")
}

//--------------------------------------
// in memory transport

pub type Responder = Box<dyn FnMut(&Message, SocketAddr) -> Vec<(Bytes, SocketAddr)>>;

pub struct SentRequest {
    pub request: Message,
    pub dst: SocketAddr,
    pub at: Instant,
}

/// Hands every request to `responder` and queues what it returns.
/// Reads with nothing queued sleep until the deadline.
pub struct FakeTransport {
    local_addr: SocketAddr,
    responder: Responder,
    inbox: VecDeque<(Bytes, SocketAddr)>,
    recv_error: Option<io::ErrorKind>,
    send_error: Option<io::ErrorKind>,
    short_write: bool,
    pub sent: Vec<SentRequest>,
}

impl FakeTransport {
    pub fn new(local_addr: SocketAddr, responder: Responder) -> Self {
        Self {
            local_addr,
            responder,
            inbox: VecDeque::new(),
            recv_error: None,
            send_error: None,
            short_write: false,
            sent: vec![],
        }
    }

    pub fn silent(local_addr: SocketAddr) -> Self {
        Self::new(
            local_addr,
            Box::new(|_: &Message, _: SocketAddr| -> Vec<(Bytes, SocketAddr)> { vec![] }),
        )
    }

    pub fn failing(local_addr: SocketAddr, kind: io::ErrorKind) -> Self {
        let mut transport = Self::silent(local_addr);
        transport.recv_error = Some(kind);
        transport
    }

    pub fn failing_send(local_addr: SocketAddr, kind: io::ErrorKind) -> Self {
        let mut transport = Self::silent(local_addr);
        transport.send_error = Some(kind);
        transport
    }

    // 每次只发出一半
    pub fn short_write(local_addr: SocketAddr) -> Self {
        let mut transport = Self::silent(local_addr);
        transport.short_write = true;
        transport
    }

    pub fn send_gaps(&self) -> Vec<u128> {
        self.sent
            .windows(2)
            .map(|v| (v[1].at - v[0].at).as_millis())
            .collect()
    }
}

impl Transport for FakeTransport {
    async fn send_to(&mut self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        let request =
            Message::unpack(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let replies = (self.responder)(&request, target);
        self.inbox.extend(replies);
        self.sent.push(SentRequest {
            request,
            dst: target,
            at: Instant::now(),
        });

        if let Some(kind) = self.send_error {
            return Err(io::Error::new(kind, "send failed"));
        }
        match self.short_write {
            true => Ok(buf.len() / 2),
            false => Ok(buf.len()),
        }
    }

    async fn recv_from(
        &mut self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<Option<(usize, SocketAddr)>> {
        if let Some(kind) = self.recv_error {
            return Err(io::Error::new(kind, "recv failed"));
        }

        if let Some((data, from)) = self.inbox.pop_front() {
            buf[..data.len()].copy_from_slice(&data);
            return Ok(Some((data.len(), from)));
        }

        tokio::time::sleep_until(deadline).await;
        Ok(None)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok(self.local_addr)
    }
}

//--------------------------------------
// response building, shared by the simulated and the loopback servers

pub fn get_change_flag(req: &Message) -> ChangeRequest {
    req.find_attr(AttrType::ChangeRequest)
        .and_then(|v| ChangeRequest::try_from(v).ok())
        .unwrap_or_default()
}

// 备用地址: 换 ip 或 port
pub fn get_ca_cp(da: IpAddr, dp: u16, ips: [IpAddr; 2], ports: [u16; 2]) -> (IpAddr, u16) {
    let ca = match da == ips[0] {
        true => ips[1],
        false => ips[0],
    };

    let cp = match dp == ports[0] {
        true => ports[1],
        false => ports[0],
    };

    (ca, cp)
}

pub fn binding_response(req: &Message, mapped: SocketAddr, changed: SocketAddr) -> Bytes {
    let mut response = Message::with_trans_id(MessageType::BindingResponse, *req.trans_id());
    response
        .add_attr(AddressAttr::new(AttrType::MappedAddress, mapped).into())
        .expect("mapped address fits");
    response
        .add_attr(AddressAttr::new(AttrType::ChangedAddress, changed).into())
        .expect("changed address fits");
    response.pack()
}

pub fn bad_response(req: &Message) -> Bytes {
    let mut response = Message::with_trans_id(MessageType::BindingErrorResponse, *req.trans_id());
    let attr = RawAttr::try_from(ErrcodeAttr::new(400, "bad request")).expect("short reason");
    response.add_attr(attr).expect("error code fits");
    response.pack()
}

//--------------------------------------
// simulated network between client and a two address server

/// Which probes reach the client, and what the NAT maps them to.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub local: SocketAddr,
    pub primary: SocketAddr,
    pub alternate: SocketAddr,
    pub mapped: SocketAddr,
    // mapping seen by the alternate server, differs under a symmetric NAT
    pub mapped_alternate: SocketAddr,
    pub answer_plain: bool,
    pub answer_change_both: bool,
    pub answer_alternate: bool,
    pub answer_change_port: bool,
}

impl Scenario {
    pub fn new() -> Self {
        Self {
            local: addr("192.168.1.10:40000"),
            primary: addr("203.0.113.1:3478"),
            alternate: addr("203.0.113.2:3479"),
            mapped: addr("198.51.100.7:50000"),
            mapped_alternate: addr("198.51.100.7:50000"),
            answer_plain: true,
            answer_change_both: true,
            answer_alternate: true,
            answer_change_port: true,
        }
    }

    pub fn public(mut self) -> Self {
        self.mapped = self.local;
        self.mapped_alternate = self.local;
        self
    }

    pub fn responder(&self) -> Responder {
        let s = self.clone();
        let ips = [s.primary.ip(), s.alternate.ip()];
        let ports = [s.primary.port(), s.alternate.port()];

        Box::new(move |req: &Message, dst: SocketAddr| {
            let flag = get_change_flag(req);
            let (ca, cp) = get_ca_cp(dst.ip(), dst.port(), ips, ports);
            let changed = SocketAddr::new(ca, cp);

            let src_ip = match flag.change_ip {
                true => ca,
                false => dst.ip(),
            };
            let src_port = match flag.change_port {
                true => cp,
                false => dst.port(),
            };
            let src = SocketAddr::new(src_ip, src_port);

            let answered = match (dst == s.primary, flag.change_ip, flag.change_port) {
                (true, false, false) => s.answer_plain,
                (true, true, true) => s.answer_change_both,
                (true, false, true) => s.answer_change_port,
                (false, false, false) => s.answer_alternate,
                _ => false,
            };
            if !answered {
                return vec![];
            }

            let mapped = match dst == s.primary {
                true => s.mapped,
                false => s.mapped_alternate,
            };
            vec![(binding_response(req, mapped, changed), src)]
        })
    }

    pub fn transport(&self) -> FakeTransport {
        FakeTransport::new(self.local, self.responder())
    }
}

//--------------------------------------
// loopback server, 127.0.0.1 with two ports

pub struct LoopbackServer {
    pub primary: SocketAddr,
    pub alternate: SocketAddr,
    handles: Vec<JoinHandle<()>>,
}

impl Drop for LoopbackServer {
    fn drop(&mut self) {
        for h in self.handles.iter() {
            h.abort();
        }
    }
}

impl LoopbackServer {
    /// `answer` false gives a server that reads and never replies.
    pub async fn start(answer: bool) -> io::Result<Self> {
        let sock1 = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);
        let sock2 = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);
        let primary = sock1.local_addr()?;
        let alternate = sock2.local_addr()?;

        let mut handles = vec![];
        for (socket, other) in [
            (sock1.clone(), sock2.clone()),
            (sock2.clone(), sock1.clone()),
        ] {
            let h = tokio::spawn(async move {
                serve(socket, other, answer).await;
            });
            handles.push(h);
        }

        Ok(Self {
            primary,
            alternate,
            handles,
        })
    }
}

// 只有一个 ip, change-ip 和 change-port 都由另一个端口的 socket 发出
async fn serve(socket: Arc<UdpSocket>, other: Arc<UdpSocket>, answer: bool) {
    let mut buf = vec![0u8; 32 * 1024];
    let other_addr = match other.local_addr() {
        Ok(v) => v,
        Err(_) => return,
    };

    loop {
        let (len, remote_addr) = match socket.recv_from(&mut buf).await {
            Ok(v) => v,
            Err(_) => return,
        };
        if !answer {
            continue;
        }

        let req = match Message::unpack(&buf[..len]) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if req.msg_type() != MessageType::BindingRequest {
            let _ = socket.send_to(&bad_response(&req), remote_addr).await;
            continue;
        }

        let flag = get_change_flag(&req);
        let response = binding_response(&req, remote_addr, other_addr);
        let from = match flag.change_ip || flag.change_port {
            true => &other,
            false => &socket,
        };
        let _ = from.send_to(&response, remote_addr).await;
    }
}
