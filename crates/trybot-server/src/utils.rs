//! Server utilities.

use std::{
    borrow::Borrow,
    collections::{HashSet, VecDeque},
    error::Error,
    hash::Hash,
};

use actix_web::web::{Bytes, BytesMut, Payload};
use futures::stream::StreamExt;

/// Bounded set remembering the most recently inserted values.
#[derive(Debug)]
pub struct SeenWindow<T> {
    capacity: usize,
    order: VecDeque<T>,
    values: HashSet<T>,
}

impl<T: Eq + Hash + Clone> SeenWindow<T> {
    /// Create a window holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            values: HashSet::new(),
        }
    }

    /// Remember a value. Returns `false` if it was already known.
    pub fn insert(&mut self, value: T) -> bool {
        if self.values.contains(&value) {
            return false;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.values.remove(&oldest);
            }
        }

        self.order.push_back(value.clone());
        self.values.insert(value);
        true
    }

    /// Forget a value. Returns `false` if it was not known.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if !self.values.remove(value) {
            return false;
        }

        self.order.retain(|v| v.borrow() != value);
        true
    }

    /// Check if a value is known.
    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// Known values count.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no value is known.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Convert Actix payload to bytes.
pub async fn convert_payload_to_bytes(payload: &mut Payload) -> Result<Bytes, Box<dyn Error>> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        body.extend_from_slice(&chunk?);
    }

    Ok(body.into())
}

/// Convert Actix payload to string.
pub async fn convert_payload_to_string(payload: &mut Payload) -> Result<String, Box<dyn Error>> {
    let bytes = convert_payload_to_bytes(payload).await?;
    std::str::from_utf8(&bytes)
        .map(ToOwned::to_owned)
        .map_err(Into::into)
}
