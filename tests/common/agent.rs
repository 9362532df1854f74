//! A loopback UDP agent serving a fixed MIB.
//!
//! Built only from the crate's public wire types, so the session talks to
//! it exactly as it would to a real device.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use typed_snmp::message::CommunityMessage;
use typed_snmp::pdu::{Binding, Pdu, PduType};
use typed_snmp::{ErrorStatus, Oid, Value, Version};

use super::COMMUNITY;

/// How the agent misbehaves, if at all.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub mib: BTreeMap<Oid, Value>,
    /// Requests with another community are dropped.
    pub community: Vec<u8>,
    /// Never answer.
    pub silent: bool,
    /// Added to the request-id of every response.
    pub request_id_skew: i32,
    /// Answer every GETNEXT with this OID, ignoring the MIB.
    pub stuck_at: Option<Oid>,
    /// Hold the reply to the first request this long.
    pub first_reply_delay: Option<Duration>,
}

impl AgentConfig {
    pub fn new(mib: BTreeMap<Oid, Value>) -> Self {
        Self {
            mib,
            community: COMMUNITY.to_vec(),
            silent: false,
            request_id_skew: 0,
            stuck_at: None,
            first_reply_delay: None,
        }
    }
}

pub struct FakeAgent {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FakeAgent {
    pub async fn start(mib: BTreeMap<Oid, Value>) -> Self {
        Self::start_with(AgentConfig::new(mib)).await
    }

    pub async fn start_with(config: AgentConfig) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        let mut config = config;
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 65535];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;

                let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len]))
                else {
                    continue;
                };
                if config.silent || request.community[..] != config.community[..] {
                    continue;
                }

                let response = respond(&mut config, &request);
                if let (1, Some(delay)) = (seen, config.first_reply_delay) {
                    tokio::time::sleep(delay).await;
                }
                let _ = socket.send_to(&response.encode(), peer).await;
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Datagrams received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn respond(config: &mut AgentConfig, request: &CommunityMessage) -> CommunityMessage {
    let pdu = &request.pdu;
    let v1 = request.version == Version::V1;
    let request_id = pdu.request_id.wrapping_add(config.request_id_skew);

    let next = |oid: &Oid| -> Option<Binding> {
        if let Some(stuck) = &config.stuck_at {
            return Some(Binding::new(stuck.clone(), Value::Integer(0)));
        }
        config
            .mib
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .next()
            .map(|(oid, value)| Binding::new(oid.clone(), value.clone()))
    };

    // v1 reports any missing object as noSuchName on the whole PDU.
    let v1_error = |index: usize| {
        Pdu::response(
            request_id,
            ErrorStatus::NoSuchName,
            index as i32 + 1,
            pdu.bindings.clone(),
        )
    };

    let response = match pdu.pdu_type {
        PduType::GetRequest => {
            let mut bindings = Vec::new();
            let mut failed = None;
            for (i, b) in pdu.bindings.iter().enumerate() {
                match config.mib.get(&b.oid) {
                    Some(value) => bindings.push(Binding::new(b.oid.clone(), value.clone())),
                    None if v1 => {
                        failed = Some(i);
                        break;
                    }
                    None => bindings.push(Binding::new(b.oid.clone(), Value::NoSuchObject)),
                }
            }
            match failed {
                Some(i) => v1_error(i),
                None => Pdu::response(request_id, ErrorStatus::NoError, 0, bindings),
            }
        }
        PduType::GetNextRequest => {
            let mut bindings = Vec::new();
            let mut failed = None;
            for (i, b) in pdu.bindings.iter().enumerate() {
                match next(&b.oid) {
                    Some(found) => bindings.push(found),
                    None if v1 => {
                        failed = Some(i);
                        break;
                    }
                    None => bindings.push(Binding::new(b.oid.clone(), Value::EndOfMibView)),
                }
            }
            match failed {
                Some(i) => v1_error(i),
                None => Pdu::response(request_id, ErrorStatus::NoError, 0, bindings),
            }
        }
        PduType::GetBulkRequest => {
            let non_repeaters = (pdu.non_repeaters().max(0) as usize).min(pdu.bindings.len());
            let max_repetitions = pdu.max_repetitions().max(0) as usize;
            let end = |oid: &Oid| Binding::new(oid.clone(), Value::EndOfMibView);

            let mut bindings: Vec<Binding> = pdu.bindings[..non_repeaters]
                .iter()
                .map(|b| next(&b.oid).unwrap_or_else(|| end(&b.oid)))
                .collect();

            let mut cursors: Vec<Oid> = pdu.bindings[non_repeaters..]
                .iter()
                .map(|b| b.oid.clone())
                .collect();
            for _ in 0..max_repetitions {
                if cursors.is_empty() {
                    break;
                }
                let mut all_ended = true;
                for cursor in cursors.iter_mut() {
                    match next(cursor) {
                        Some(found) => {
                            *cursor = found.oid.clone();
                            bindings.push(found);
                            all_ended = false;
                        }
                        None => bindings.push(end(cursor)),
                    }
                }
                if all_ended {
                    break;
                }
            }
            Pdu::response(request_id, ErrorStatus::NoError, 0, bindings)
        }
        PduType::SetRequest => {
            // All or nothing: check every binding before writing any.
            let rejected = pdu.bindings.iter().enumerate().find_map(|(i, b)| {
                match config.mib.get(&b.oid) {
                    None if v1 => Some((i, ErrorStatus::NoSuchName)),
                    None => Some((i, ErrorStatus::NoCreation)),
                    Some(current) if current.snmp_type() != b.value.snmp_type() => {
                        Some((i, if v1 { ErrorStatus::BadValue } else { ErrorStatus::WrongType }))
                    }
                    Some(_) => None,
                }
            });
            match rejected {
                Some((i, status)) => {
                    Pdu::response(request_id, status, i as i32 + 1, pdu.bindings.clone())
                }
                None => {
                    for b in &pdu.bindings {
                        config.mib.insert(b.oid.clone(), b.value.clone());
                    }
                    Pdu::response(request_id, ErrorStatus::NoError, 0, pdu.bindings.clone())
                }
            }
        }
        PduType::Response | PduType::Report => {
            Pdu::response(request_id, ErrorStatus::GenErr, 0, Vec::new())
        }
    };

    CommunityMessage::new(request.version, request.community.clone(), response)
}
