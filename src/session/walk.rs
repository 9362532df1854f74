//! Subtree walks.
//!
//! A walk keeps a cursor, starting at the root, and asks the agent for
//! whatever follows it. Each returned binding is checked in order:
//!
//! 1. ENDOFMIBVIEW ends the walk.
//! 2. An OID outside the root's subtree ends the walk.
//! 3. An OID that does not sort after the cursor fails the walk with
//!    [`Error::NonIncreasingOid`], so a broken agent cannot loop it.
//!
//! Accepted bindings get the root as their
//! [`root_oid`](crate::VarBind::root_oid) and move the cursor forward.
//! Walks are lazy and single-use.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::transport::Transport;
use crate::varbind::VarBind;
use crate::varbind_list::VarBindList;
use crate::version::Version;

use super::Session;

type PendingPage = Pin<Box<dyn Future<Output = Result<VarBindList>> + Send>>;

/// Request type for [`Session::walk_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    /// GETBULK on v2c, GETNEXT on v1.
    #[default]
    Auto,
    GetNext,
    GetBulk,
}

enum Step {
    Yield(VarBind),
    /// Yield, then end the walk.
    YieldLast(VarBind),
    Stop,
    Fail(Error),
}

fn classify(root: &Oid, cursor: &Oid, vb: VarBind) -> Step {
    if vb.value().is_end_of_mib_view() {
        return Step::Stop;
    }

    // Out-of-subtree bindings end the walk whatever their value.
    if !vb.oid().starts_with(root) {
        return Step::Stop;
    }

    if vb.oid() <= cursor {
        return Step::Fail(Error::NonIncreasingOid {
            previous: cursor.clone(),
            current: vb.oid().clone(),
        });
    }

    let vb = vb.with_root_oid(root.clone());
    if vb.value().is_exception() {
        Step::YieldLast(vb)
    } else {
        Step::Yield(vb)
    }
}

/// v1 agents report the end of the MIB as a noSuchName error.
fn is_v1_end_of_mib(version: Version, err: &Error) -> bool {
    version == Version::V1
        && matches!(
            err,
            Error::Snmp {
                status: ErrorStatus::NoSuchName,
                ..
            }
        )
}

/// Shared walk bookkeeping.
struct Cursor {
    root: Oid,
    cursor: Oid,
    limit: Option<usize>,
    yielded: usize,
    done: bool,
}

impl Cursor {
    fn new(root: Oid) -> Self {
        Self {
            cursor: root.clone(),
            root,
            limit: None,
            yielded: 0,
            done: false,
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            tracing::debug!(
                snmp.root_oid = %self.root,
                yielded = self.yielded,
                "walk finished"
            );
        }
    }

    /// Apply the termination checks and advance on acceptance.
    fn step(&mut self, vb: VarBind) -> Poll<Option<Result<VarBind>>> {
        match classify(&self.root, &self.cursor, vb) {
            Step::Yield(vb) => {
                self.cursor = vb.oid().clone();
                self.yielded += 1;
                Poll::Ready(Some(Ok(vb)))
            }
            Step::YieldLast(vb) => {
                self.yielded += 1;
                self.finish();
                Poll::Ready(Some(Ok(vb)))
            }
            Step::Stop => {
                self.finish();
                Poll::Ready(None)
            }
            Step::Fail(err) => {
                self.finish();
                Poll::Ready(Some(Err(err)))
            }
        }
    }

    fn fail(&mut self, version: Version, err: Error) -> Poll<Option<Result<VarBind>>> {
        self.finish();
        if is_v1_end_of_mib(version, &err) {
            Poll::Ready(None)
        } else {
            Poll::Ready(Some(Err(err)))
        }
    }
}

/// Drain any walk stream into a list, stopping at the first error.
async fn drain<S>(mut stream: S) -> Result<VarBindList>
where
    S: Stream<Item = Result<VarBind>> + Unpin,
{
    let mut varbinds = Vec::new();
    while let Some(item) =
        std::future::poll_fn(|cx: &mut Context<'_>| Pin::new(&mut stream).poll_next(cx)).await
    {
        varbinds.push(item?);
    }
    Ok(VarBindList::new(varbinds))
}

/// Async stream walking a subtree with GETNEXT.
///
/// Created by [`Session::walk()`].
pub struct Walk<T: Transport> {
    session: Session<T>,
    state: Cursor,
    pending: Option<PendingPage>,
}

impl<T: Transport> Walk<T> {
    pub(crate) fn new(session: Session<T>, root: Oid) -> Self {
        Self {
            session,
            state: Cursor::new(root),
            pending: None,
        }
    }

    /// Stop after `n` bindings.
    pub fn limit(mut self, n: usize) -> Self {
        self.state.limit = Some(n);
        self
    }

    pub fn root(&self) -> &Oid {
        &self.state.root
    }

    /// Collect every remaining binding.
    pub async fn collect_all(self) -> Result<VarBindList> {
        drain(self).await
    }
}

impl<T: Transport> Stream for Walk<T> {
    type Item = Result<VarBind>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.state.done {
            return Poll::Ready(None);
        }
        if this.state.limit_reached() {
            this.state.finish();
            return Poll::Ready(None);
        }

        let pending = this.pending.get_or_insert_with(|| {
            let session = this.session.clone();
            let oid = this.state.cursor.clone();
            Box::pin(async move { session.get_next(std::slice::from_ref(&oid)).await })
        });

        let result = match pending.as_mut().poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };
        this.pending = None;

        match result {
            Ok(list) => match list.into_iter().next() {
                Some(vb) => this.state.step(vb),
                None => {
                    this.state.finish();
                    Poll::Ready(None)
                }
            },
            Err(err) => this.state.fail(this.session.version(), err),
        }
    }
}

/// Async stream walking a subtree with GETBULK.
///
/// Created by [`Session::bulk_walk()`]. Each page is one GETBULK with
/// non-repeaters 0, starting after the last accepted binding.
pub struct BulkWalk<T: Transport> {
    session: Session<T>,
    state: Cursor,
    max_repetitions: i32,
    buffer: VecDeque<VarBind>,
    pending: Option<PendingPage>,
}

impl<T: Transport> BulkWalk<T> {
    pub(crate) fn new(session: Session<T>, root: Oid, max_repetitions: i32) -> Self {
        Self {
            session,
            state: Cursor::new(root),
            max_repetitions,
            buffer: VecDeque::new(),
            pending: None,
        }
    }

    /// Stop after `n` bindings.
    pub fn limit(mut self, n: usize) -> Self {
        self.state.limit = Some(n);
        self
    }

    pub fn root(&self) -> &Oid {
        &self.state.root
    }

    /// Collect every remaining binding.
    pub async fn collect_all(self) -> Result<VarBindList> {
        drain(self).await
    }
}

impl<T: Transport> Stream for BulkWalk<T> {
    type Item = Result<VarBind>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.state.done {
                return Poll::Ready(None);
            }
            if this.state.limit_reached() {
                this.state.finish();
                return Poll::Ready(None);
            }

            if let Some(vb) = this.buffer.pop_front() {
                let step = this.state.step(vb);
                if this.state.done {
                    this.buffer.clear();
                }
                return step;
            }

            let pending = this.pending.get_or_insert_with(|| {
                let session = this.session.clone();
                let oid = this.state.cursor.clone();
                let max_repetitions = this.max_repetitions;
                tracing::trace!(
                    snmp.root_oid = %this.state.root,
                    snmp.max_repetitions = max_repetitions,
                    "requesting next bulk page"
                );
                Box::pin(async move {
                    session
                        .get_bulk(std::slice::from_ref(&oid), 0, max_repetitions)
                        .await
                })
            });

            let result = match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(result) => result,
            };
            this.pending = None;

            match result {
                Ok(list) if list.is_empty() => {
                    this.state.finish();
                    return Poll::Ready(None);
                }
                Ok(list) => this.buffer.extend(list),
                Err(err) => return this.state.fail(this.session.version(), err),
            }
        }
    }
}

/// Either walk, chosen at runtime by [`WalkMode`].
pub enum WalkStream<T: Transport> {
    GetNext(Walk<T>),
    GetBulk(BulkWalk<T>),
}

impl<T: Transport> WalkStream<T> {
    /// Stop after `n` bindings.
    pub fn limit(self, n: usize) -> Self {
        match self {
            WalkStream::GetNext(walk) => WalkStream::GetNext(walk.limit(n)),
            WalkStream::GetBulk(walk) => WalkStream::GetBulk(walk.limit(n)),
        }
    }

    pub fn root(&self) -> &Oid {
        match self {
            WalkStream::GetNext(walk) => walk.root(),
            WalkStream::GetBulk(walk) => walk.root(),
        }
    }

    /// Collect every remaining binding.
    pub async fn collect_all(self) -> Result<VarBindList> {
        drain(self).await
    }
}

impl<T: Transport> Stream for WalkStream<T> {
    type Item = Result<VarBind>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut() {
            WalkStream::GetNext(walk) => Pin::new(walk).poll_next(cx),
            WalkStream::GetBulk(walk) => Pin::new(walk).poll_next(cx),
        }
    }
}
