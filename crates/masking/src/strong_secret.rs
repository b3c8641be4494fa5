//!
//! Structure describing a secret that is zeroized on drop.
//!

use std::{fmt, marker::PhantomData, str::FromStr};

use subtle::ConstantTimeEq;
use zeroize::Zeroize as ZeroizableSecret;

use crate::{strategy::Strategy, ExposeInterface, PeekInterface};

/// Secret that is wiped from memory when dropped.
///
/// Equality checks run in constant time so that comparing two secrets does not
/// leak how far they match.
pub struct StrongSecret<S: ZeroizableSecret, I = crate::WithType> {
    /// Inner secret value
    pub(crate) inner_secret: S,
    pub(crate) marker: PhantomData<I>,
}

impl<S: ZeroizableSecret, I> StrongSecret<S, I> {
    /// Take ownership of a secret value
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }
}

impl<S: ZeroizableSecret, I> PeekInterface<S> for StrongSecret<S, I> {
    fn peek(&self) -> &S {
        &self.inner_secret
    }

    fn peek_mut(&mut self) -> &mut S {
        &mut self.inner_secret
    }
}

impl<S, I> ExposeInterface<S> for StrongSecret<S, I>
where
    S: ZeroizableSecret + Clone,
{
    fn expose(self) -> S {
        self.inner_secret.clone()
    }
}

impl<S: ZeroizableSecret, I> From<S> for StrongSecret<S, I> {
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S, I> FromStr for StrongSecret<S, I>
where
    S: ZeroizableSecret + FromStr,
{
    type Err = <S as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(S::from_str(s)?))
    }
}

impl<S, I> Clone for StrongSecret<S, I>
where
    S: ZeroizableSecret + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.inner_secret.clone())
    }
}

impl<S, I> PartialEq for StrongSecret<S, I>
where
    S: ZeroizableSecret + StrongEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner_secret.strong_eq(&other.inner_secret)
    }
}

impl<S, I> Eq for StrongSecret<S, I> where S: ZeroizableSecret + StrongEq {}

impl<S: ZeroizableSecret, I> fmt::Debug for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S: ZeroizableSecret, I> fmt::Display for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S, I> Default for StrongSecret<S, I>
where
    S: ZeroizableSecret + Default,
{
    fn default() -> Self {
        S::default().into()
    }
}

impl<S: ZeroizableSecret, I> Drop for StrongSecret<S, I> {
    fn drop(&mut self) {
        self.inner_secret.zeroize();
    }
}

/// Constant-time equality on the byte representation of a secret.
pub trait StrongEq {
    /// Compare without early exit on the first mismatching byte.
    fn strong_eq(&self, other: &Self) -> bool;
}

impl StrongEq for String {
    fn strong_eq(&self, other: &Self) -> bool {
        bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }
}

impl StrongEq for Vec<u8> {
    fn strong_eq(&self, other: &Self) -> bool {
        bool::from(self.as_slice().ct_eq(other.as_slice()))
    }
}
