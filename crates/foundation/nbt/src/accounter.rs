use crate::io::NbtIoError;
use crate::settings::DepthLimit;


/// The running budget of a single decode: a cumulative byte quota and a nesting-depth quota.
///
/// Every decoded node charges the same cost that [`NbtTag::size_in_bytes`] reports for it, and
/// variable-size nodes charge their declared length before allocating, so hostile length
/// prefixes fail here instead of in the allocator. Lists and compounds push one level of depth
/// while their payload is read.
///
/// An accounter is mutable state scoped to one decode and is not meant to be shared between
/// concurrent decodes.
///
/// [`NbtTag::size_in_bytes`]: crate::NbtTag::size_in_bytes
#[derive(Debug, Clone)]
pub struct NbtAccounter {
    quota:     Option<u64>,
    usage:     u64,
    depth:     u32,
    max_depth: Option<DepthLimit>,
}

impl NbtAccounter {
    /// The byte quota applied to tag trees received from untrusted peers.
    pub const DEFAULT_NETWORK_QUOTA: u64 = 2 * 1024 * 1024;

    /// A byte quota of `quota` and the default depth limit of 512.
    #[inline]
    pub fn new(quota: u64) -> Self {
        Self::with_depth_limit(quota, DepthLimit::default())
    }

    #[inline]
    pub fn with_depth_limit(quota: u64, depth_limit: DepthLimit) -> Self {
        Self {
            quota:     Some(quota),
            usage:     0,
            depth:     0,
            max_depth: Some(depth_limit),
        }
    }

    /// No byte quota, but nesting is still limited.
    #[inline]
    pub fn depth_limited(depth_limit: DepthLimit) -> Self {
        Self {
            quota:     None,
            usage:     0,
            depth:     0,
            max_depth: Some(depth_limit),
        }
    }

    /// No byte quota, but the default depth limit still applies.
    #[inline]
    pub fn unlimited_heap() -> Self {
        Self::depth_limited(DepthLimit::default())
    }

    /// Enforces nothing. Only for trusted data of known size, such as a world's own save files.
    #[inline]
    pub fn unlimited() -> Self {
        Self {
            quota:     None,
            usage:     0,
            depth:     0,
            max_depth: None,
        }
    }

    /// Bytes charged so far.
    #[inline]
    pub fn usage(&self) -> u64 {
        self.usage
    }

    #[inline]
    pub fn quota(&self) -> Option<u64> {
        self.quota
    }

    /// The current nesting depth.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Charges `bytes`, failing once the total exceeds the quota.
    pub fn account_bytes(&mut self, bytes: u64) -> Result<(), NbtIoError> {
        self.usage = self.usage.saturating_add(bytes);
        match self.quota {
            Some(quota) if self.usage > quota => Err(NbtIoError::QuotaExceeded {
                usage: self.usage,
                quota,
            }),
            _ => Ok(()),
        }
    }

    /// Charges `count` elements of `per_element` bytes each.
    #[inline]
    pub fn account_elements(&mut self, per_element: u64, count: usize) -> Result<(), NbtIoError> {
        self.account_bytes(per_element.saturating_mul(count as u64))
    }

    /// Enters one level of list or compound nesting.
    pub fn push_depth(&mut self) -> Result<(), NbtIoError> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit.limit() {
                return Err(NbtIoError::ExceededDepthLimit { limit: limit.limit() });
            }
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    pub fn pop_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for NbtAccounter {
    /// The network quota with the default depth limit.
    #[inline]
    fn default() -> Self {
        Self::new(Self::DEFAULT_NETWORK_QUOTA)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_is_cumulative() {
        let mut accounter = NbtAccounter::new(20);
        accounter.account_bytes(12).unwrap();
        accounter.account_bytes(8).unwrap();
        assert_eq!(accounter.usage(), 20);

        let err = accounter.account_bytes(1).unwrap_err();
        assert!(matches!(err, NbtIoError::QuotaExceeded { usage: 21, quota: 20 }), "{err:?}");
    }

    #[test]
    fn element_charges_saturate() {
        let mut accounter = NbtAccounter::new(1 << 20);
        assert!(accounter.account_elements(u64::MAX, 2).is_err());
    }

    #[test]
    fn depth_limit() {
        let mut accounter = NbtAccounter::with_depth_limit(u64::MAX, DepthLimit::new(2));
        accounter.push_depth().unwrap();
        accounter.push_depth().unwrap();
        let err = accounter.push_depth().unwrap_err();
        assert!(matches!(err, NbtIoError::ExceededDepthLimit { limit: 2 }), "{err:?}");

        accounter.pop_depth();
        accounter.push_depth().unwrap();
        assert_eq!(accounter.depth(), 2);
    }

    #[test]
    fn unlimited_enforces_nothing() {
        let mut accounter = NbtAccounter::unlimited();
        accounter.account_bytes(u64::MAX).unwrap();
        accounter.account_bytes(u64::MAX).unwrap();
        for _ in 0..10_000 {
            accounter.push_depth().unwrap();
        }
        assert_eq!(accounter.quota(), None);
    }
}
