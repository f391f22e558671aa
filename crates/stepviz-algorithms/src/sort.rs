//! Sorting algorithms.
//!
//! Every sort works in place on the run's sequence, emits a step at each
//! comparison or move, and ends with a final frame marking every element
//! [`Role::Sorted`].

use stepviz_engine::{Layout, Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::Value;

type RunResult = std::result::Result<Outcome, RunError>;

/// Number of buckets used by [`bucket`].
pub const BUCKET_COUNT: usize = 10;

/// Widest `max - min` accepted by counting sort.
pub const COUNTING_RANGE_LIMIT: u64 = 10_000;

/// Largest magnitude counting and radix sort accept; every whole number up
/// to it has an exact `f64` representation.
pub const WHOLE_LIMIT: Value = 9_007_199_254_740_992.0;

/// Smallest and largest value, or `None` for an empty slice.
pub(crate) fn bounds(values: &[Value]) -> Option<(Value, Value)> {
    let (&first, rest) = values.split_first()?;
    Some(rest.iter().fold((first, first), |(min, max), &v| (min.min(v), max.max(v))))
}

/// Whether `value` is a whole number counting and radix sort can index by.
pub(crate) fn is_whole(value: Value) -> bool {
    value.fract() == 0.0 && value.abs() <= WHOLE_LIMIT
}

fn finish(values: &[Value], emitter: &mut StepEmitter) -> RunResult {
    emitter.emit_final(Step::bars(values).all(Role::Sorted))?;
    Ok(Outcome::Completed)
}

/// Repeatedly swap adjacent out-of-order pairs.
pub fn bubble(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let n = values.len();
    for pass in 0..n {
        let mut swapped = false;
        for j in 0..n - pass - 1 {
            emitter.emit(
                Step::bars(values)
                    .with_all(n - pass..n, Role::Sorted)
                    .with(j, Role::Comparing)
                    .with(j + 1, Role::Comparing),
            )?;
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    finish(values, emitter)
}

/// Select the minimum of the unsorted suffix and move it to the front.
pub fn selection(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let n = values.len();
    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            emitter.emit(
                Step::bars(values)
                    .with_all(0..i, Role::Sorted)
                    .with(min, Role::Pivot)
                    .with(j, Role::Comparing),
            )?;
            if values[j] < values[min] {
                min = j;
            }
        }
        values.swap(i, min);
    }
    finish(values, emitter)
}

/// Shift each element left past larger neighbours.
pub fn insertion(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    for i in 1..values.len() {
        let key = values[i];
        let mut j = i;
        while j > 0 && values[j - 1] > key {
            emitter.emit(
                Step::bars(values)
                    .with(j - 1, Role::Comparing)
                    .with(j, Role::Pivot),
            )?;
            values[j] = values[j - 1];
            j -= 1;
        }
        values[j] = key;
        emitter.emit(Step::bars(values).with(j, Role::Comparing))?;
    }
    finish(values, emitter)
}

/// Top-down merge sort.
pub fn merge(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    merge_range(values, 0, values.len(), emitter)?;
    finish(values, emitter)
}

fn merge_range(
    values: &mut [Value],
    lo: usize,
    hi: usize,
    emitter: &mut StepEmitter,
) -> Result<(), RunError> {
    if hi - lo < 2 {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    merge_range(values, lo, mid, emitter)?;
    merge_range(values, mid, hi, emitter)?;
    merge_halves(values, lo, mid, hi, emitter)
}

fn merge_halves(
    values: &mut [Value],
    lo: usize,
    mid: usize,
    hi: usize,
    emitter: &mut StepEmitter,
) -> Result<(), RunError> {
    let left = values[lo..mid].to_vec();
    let right = values[mid..hi].to_vec();
    let (mut i, mut j) = (0, 0);

    for k in lo..hi {
        let take_left = j >= right.len() || (i < left.len() && left[i] <= right[j]);
        if take_left {
            values[k] = left[i];
            i += 1;
        } else {
            values[k] = right[j];
            j += 1;
        }
        emitter.emit(
            Step::bars(values)
                .with_all(lo..hi, Role::Range)
                .with(k, Role::Comparing),
        )?;
    }
    Ok(())
}

/// Quick sort with Lomuto partitioning around the last element.
pub fn quick(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    quick_range(values, 0, values.len(), emitter)?;
    finish(values, emitter)
}

fn quick_range(
    values: &mut [Value],
    lo: usize,
    hi: usize,
    emitter: &mut StepEmitter,
) -> Result<(), RunError> {
    if hi <= lo + 1 {
        return Ok(());
    }
    let pivot = partition(values, lo, hi, emitter)?;
    quick_range(values, lo, pivot, emitter)?;
    quick_range(values, pivot + 1, hi, emitter)
}

fn partition(
    values: &mut [Value],
    lo: usize,
    hi: usize,
    emitter: &mut StepEmitter,
) -> Result<usize, RunError> {
    let pivot_index = hi - 1;
    let pivot = values[pivot_index];
    let mut store = lo;

    for j in lo..pivot_index {
        emitter.emit(
            Step::bars(values)
                .with(pivot_index, Role::Pivot)
                .with(j, Role::Comparing),
        )?;
        if values[j] < pivot {
            values.swap(store, j);
            store += 1;
        }
    }
    values.swap(store, pivot_index);
    emitter.emit(Step::bars(values).with(store, Role::Pivot))?;
    Ok(store)
}

/// Build a max-heap, then repeatedly move the root behind the heap.
pub fn heap(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let n = values.len();
    for root in (0..n / 2).rev() {
        sift_down(values, root, n, emitter)?;
    }
    for end in (1..n).rev() {
        values.swap(0, end);
        emitter.emit(
            Step::bars(values)
                .with_all(end..n, Role::Sorted)
                .with(0, Role::Comparing),
        )?;
        sift_down(values, 0, end, emitter)?;
    }
    finish(values, emitter)
}

fn sift_down(
    values: &mut [Value],
    mut root: usize,
    len: usize,
    emitter: &mut StepEmitter,
) -> Result<(), RunError> {
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return Ok(());
        }
        let right = left + 1;
        let mut largest = root;
        if values[left] > values[largest] {
            largest = left;
        }
        if right < len && values[right] > values[largest] {
            largest = right;
        }

        emitter.emit(
            Step::bars(values)
                .with_all(len..values.len(), Role::Sorted)
                .with_all([left, right].into_iter().filter(|&c| c < len), Role::Comparing)
                .with(root, Role::Pivot),
        )?;
        if largest == root {
            return Ok(());
        }
        values.swap(root, largest);
        root = largest;
    }
}

/// Counting sort over `min..=max`.
///
/// Emits three phases: counting the input, prefix sums over the count
/// array, and placing elements into the output. Only reachable through
/// validation, which guarantees whole numbers spanning at most
/// [`COUNTING_RANGE_LIMIT`].
pub(crate) fn counting(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let Some((min, max)) = bounds(values) else {
        return finish(values, emitter);
    };
    let offset = |value: Value| (value - min) as usize;
    let mut count = vec![0usize; offset(max) + 1];
    let drawn = |count: &[usize]| count.iter().map(|&c| c as Value).collect::<Vec<_>>();

    for i in 0..values.len() {
        count[offset(values[i])] += 1;
        emitter.emit(
            Step::bars(values)
                .with(i, Role::Comparing)
                .with_caption("counting"),
        )?;
    }

    for i in 1..count.len() {
        count[i] += count[i - 1];
        emitter.emit(
            Step::new(Layout::Bars, drawn(&count))
                .with(i - 1, Role::Range)
                .with(i, Role::Comparing)
                .with_caption("prefix sums"),
        )?;
    }

    let mut output = vec![0.0; values.len()];
    for &value in values.iter().rev() {
        let slot = &mut count[offset(value)];
        *slot -= 1;
        let position = *slot;
        output[position] = value;
        emitter.emit(
            Step::bars(&output)
                .with(position, Role::Comparing)
                .with_caption("placing"),
        )?;
    }

    values.copy_from_slice(&output);
    finish(values, emitter)
}

/// Least-significant-digit radix sort in base 10. Only reachable through
/// validation, which guarantees non-negative whole numbers.
pub(crate) fn radix(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let max = bounds(values).map_or(0, |(_, max)| max as u64);
    let mut exp: u64 = 1;
    while max / exp > 0 {
        sort_by_digit(values, exp, emitter)?;
        match exp.checked_mul(10) {
            Some(next) => exp = next,
            None => break,
        }
    }
    finish(values, emitter)
}

fn sort_by_digit(
    values: &mut [Value],
    exp: u64,
    emitter: &mut StepEmitter,
) -> Result<(), RunError> {
    let digit = |value: Value| ((value as u64 / exp) % 10) as usize;
    let caption = format!("digit place {exp}");
    let mut count = [0usize; 10];

    for i in 0..values.len() {
        count[digit(values[i])] += 1;
        emitter.emit(
            Step::bars(values)
                .with(i, Role::Comparing)
                .with_caption(caption.clone()),
        )?;
    }
    for d in 1..count.len() {
        count[d] += count[d - 1];
    }

    let mut output = vec![0.0; values.len()];
    for &value in values.iter().rev() {
        let slot = &mut count[digit(value)];
        *slot -= 1;
        output[*slot] = value;
        emitter.emit(
            Step::bars(&output)
                .with(*slot, Role::Comparing)
                .with_caption(caption.clone()),
        )?;
    }
    values.copy_from_slice(&output);
    Ok(())
}

/// Distribute values over [`BUCKET_COUNT`] equal-width buckets, then sort
/// each bucket. Steps show the buckets side by side with separators.
///
/// The maximum lands in the last bucket; when every value is equal they
/// all share the first.
pub fn bucket(values: &mut [Value], emitter: &mut StepEmitter) -> RunResult {
    let Some((min, max)) = bounds(values) else {
        return finish(values, emitter);
    };
    let width = (max - min) / BUCKET_COUNT as Value;
    let bucket_of = |value: Value| {
        if width > 0.0 {
            (((value - min) / width) as usize).min(BUCKET_COUNT - 1)
        } else {
            0
        }
    };
    let mut buckets: Vec<Vec<Value>> = vec![Vec::new(); BUCKET_COUNT];

    for &value in values.iter() {
        let index = bucket_of(value);
        buckets[index].push(value);
        let placed = buckets[..=index].iter().map(Vec::len).sum::<usize>() - 1;
        let (flat, separators) = flatten(&buckets);
        emitter.emit(
            Step::new(Layout::Bars, flat)
                .with(placed, Role::Comparing)
                .with_separators(separators),
        )?;
    }

    let mut done = 0;
    for index in 0..BUCKET_COUNT {
        if buckets[index].is_empty() {
            continue;
        }
        buckets[index].sort_unstable_by(Value::total_cmp);
        done += buckets[index].len();
        let (flat, separators) = flatten(&buckets);
        emitter.emit(
            Step::new(Layout::Bars, flat)
                .with_all(0..done, Role::Sorted)
                .with_separators(separators),
        )?;
    }

    let (flat, _) = flatten(&buckets);
    values.copy_from_slice(&flat);
    finish(values, emitter)
}

/// Concatenate buckets and record where each non-empty bucket ends.
fn flatten(buckets: &[Vec<Value>]) -> (Vec<Value>, Vec<usize>) {
    let flat: Vec<Value> = buckets.iter().flatten().copied().collect();
    let mut separators = Vec::new();
    let mut end = 0;
    for bucket in buckets.iter().filter(|b| !b.is_empty()) {
        end += bucket.len();
        if end < flat.len() {
            separators.push(end);
        }
    }
    (flat, separators)
}
