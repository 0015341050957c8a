//! The spec-driven streaming decoder: dispatch preparation, the field loop,
//! and extension capture.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::extension::ExtensionSet;
use crate::field::WireField;
use crate::reader::Reader;

/// How decoding routes incoming tags to field sentinels.
///
/// `Standard` indexes tags through a flat array when the message's largest
/// tag is below 1024 and falls back to a tree map above that, so sparse tag
/// spaces don't allocate huge, mostly-empty tables. `Fast` always builds the
/// array; `Full` always builds the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeStrategy {
    #[default]
    Standard,
    Fast,
    Full,
}

const ARRAY_DISPATCH_MAX_TAG: u32 = 1024;

/// Per-call decoding state threaded through nested message decodes: the
/// dispatch strategy and the remaining recursion budget.
#[derive(Clone, Copy, Debug)]
pub struct DecodeContext {
    strategy: DecodeStrategy,
    #[cfg(not(feature = "no-recursion-limit"))]
    recurse_budget: u32,
}

impl Default for DecodeContext {
    fn default() -> DecodeContext {
        DecodeContext::new(DecodeStrategy::default())
    }
}

impl DecodeContext {
    pub fn new(strategy: DecodeStrategy) -> DecodeContext {
        DecodeContext {
            strategy,
            #[cfg(not(feature = "no-recursion-limit"))]
            recurse_budget: crate::RECURSION_LIMIT,
        }
    }

    pub fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }

    /// Produces the context for one more level of message nesting, failing
    /// once the recursion budget is spent.
    #[cfg(not(feature = "no-recursion-limit"))]
    pub fn enter(&self) -> Result<DecodeContext, DecodeError> {
        if self.recurse_budget == 0 {
            return Err(DecodeErrorKind::RecursionLimitReached.into());
        }
        Ok(DecodeContext {
            strategy: self.strategy,
            recurse_budget: self.recurse_budget - 1,
        })
    }

    #[cfg(feature = "no-recursion-limit")]
    pub fn enter(&self) -> Result<DecodeContext, DecodeError> {
        Ok(*self)
    }
}

/// One field sentinel's view of the streaming decoder.
///
/// A sink announces the tags it handles, then accumulates every wire
/// occurrence of those tags. The sentinel types in [`crate::sentinel`]
/// implement this; generated code finalizes them after the stream ends.
pub trait FieldSink {
    /// Appends the tags this sink consumes.
    fn register(&self, tags: &mut Vec<u32>);

    /// Accumulates one wire occurrence of a registered tag.
    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>;
}

enum Dispatch {
    Array(Vec<usize>),
    Map(BTreeMap<u32, usize>),
}

const UNHANDLED: usize = usize::MAX;

impl Dispatch {
    fn build(strategy: DecodeStrategy, sinks: &[&mut dyn FieldSink]) -> Dispatch {
        let mut pairs = Vec::new();
        let mut tags = Vec::new();
        for (index, sink) in sinks.iter().enumerate() {
            tags.clear();
            sink.register(&mut tags);
            for &tag in &tags {
                pairs.push((tag, index));
            }
        }
        let max_tag = pairs.iter().map(|&(tag, _)| tag).max().unwrap_or(0);

        let as_array = match strategy {
            DecodeStrategy::Standard => max_tag < ARRAY_DISPATCH_MAX_TAG,
            DecodeStrategy::Fast => true,
            DecodeStrategy::Full => false,
        };
        if as_array {
            let mut table = vec![UNHANDLED; max_tag as usize + 1];
            for (tag, index) in pairs {
                table[tag as usize] = index;
            }
            Dispatch::Array(table)
        } else {
            Dispatch::Map(pairs.into_iter().collect())
        }
    }

    fn lookup(&self, tag: u32) -> Option<usize> {
        match self {
            Dispatch::Array(table) => table
                .get(tag as usize)
                .copied()
                .filter(|&index| index != UNHANDLED),
            Dispatch::Map(map) => map.get(&tag).copied(),
        }
    }
}

/// Streams every field out of `reader` into the matching sink. Unknown tags
/// are consumed and dropped.
pub fn run(
    reader: &mut Reader<'_>,
    ctx: DecodeContext,
    sinks: &mut [&mut dyn FieldSink],
) -> Result<(), DecodeError> {
    run_inner(reader, ctx, sinks, &[], None)
}

/// Like [`run`], but captures unknown tags that fall within the message's
/// declared extension ranges into `extensions`, preserving wire order.
pub fn run_extensible(
    reader: &mut Reader<'_>,
    ctx: DecodeContext,
    sinks: &mut [&mut dyn FieldSink],
    extension_ranges: &[RangeInclusive<u32>],
    extensions: &mut ExtensionSet,
) -> Result<(), DecodeError> {
    run_inner(reader, ctx, sinks, extension_ranges, Some(extensions))
}

fn run_inner(
    reader: &mut Reader<'_>,
    ctx: DecodeContext,
    sinks: &mut [&mut dyn FieldSink],
    extension_ranges: &[RangeInclusive<u32>],
    mut extensions: Option<&mut ExtensionSet>,
) -> Result<(), DecodeError> {
    let dispatch = Dispatch::build(ctx.strategy(), sinks);

    while reader.has_more() {
        let (tag, field) = reader.read_field()?;
        match dispatch.lookup(tag) {
            Some(index) => sinks[index].consume(tag, field, ctx)?,
            None => {
                if let Some(set) = extensions.as_deref_mut() {
                    if extension_ranges.iter().any(|range| range.contains(&tag)) {
                        set.capture(tag, field);
                    }
                }
                // Unknown tags outside extension ranges were already
                // consumed by read_field; drop them.
            }
        }
    }
    Ok(())
}
