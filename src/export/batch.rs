//! Partitioning of an ordered key space into fixed-size windows.

/// One window of consecutive keys, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchWindow<'a, K> {
    /// 1-based batch number
    pub number: usize,
    /// Keys of this window, in key order
    pub keys: &'a [K],
}

impl<K> BatchWindow<'_, K> {
    /// First and last key of the window.
    pub fn bounds(&self) -> Option<(&K, &K)> {
        Some((self.keys.first()?, self.keys.last()?))
    }
}

/// Splits a sorted key list into windows of at most `batch_size` keys.
#[derive(Debug, Clone)]
pub struct BatchPaginator<K> {
    keys: Vec<K>,
    batch_size: usize,
}

impl<K> BatchPaginator<K> {
    /// Creates a paginator. A zero batch size is treated as one.
    pub fn new(keys: Vec<K>, batch_size: usize) -> Self {
        Self {
            keys,
            batch_size: batch_size.max(1),
        }
    }

    /// Number of keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of windows, `ceil(keys / batch_size)`.
    pub fn batch_count(&self) -> usize {
        self.keys.len().div_ceil(self.batch_size)
    }

    /// Iterates the windows in order; every key lands in exactly one.
    pub fn windows(&self) -> impl Iterator<Item = BatchWindow<'_, K>> {
        self.keys
            .chunks(self.batch_size)
            .enumerate()
            .map(|(i, keys)| BatchWindow {
                number: i + 1,
                keys,
            })
    }
}

/// File name of batch `number`: `{prefix}{number}.{extension}`.
pub fn batch_file_name(prefix: &str, number: usize, extension: &str) -> String {
    format!("{}{}.{}", prefix, number, extension.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count_rounds_up() {
        assert_eq!(BatchPaginator::new((0..5000).collect(), 2500).batch_count(), 2);
        assert_eq!(BatchPaginator::new((0..5001).collect(), 2500).batch_count(), 3);
        assert_eq!(BatchPaginator::new((0..1).collect(), 2500).batch_count(), 1);
        assert_eq!(BatchPaginator::<i32>::new(Vec::new(), 2500).batch_count(), 0);
    }

    #[test]
    fn test_windows_cover_every_key_once() {
        let paginator = BatchPaginator::new((1..=7).collect::<Vec<i32>>(), 3);
        let windows: Vec<_> = paginator.windows().collect();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].keys, &[1, 2, 3]);
        assert_eq!(windows[2].keys, &[7]);
        assert_eq!(windows[2].number, 3);
        assert_eq!(windows[1].bounds(), Some((&4, &6)));

        let flattened: Vec<i32> = windows.iter().flat_map(|w| w.keys.iter().copied()).collect();
        assert_eq!(flattened, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_file_name() {
        assert_eq!(batch_file_name("Export", 1, "json"), "Export1.json");
        assert_eq!(batch_file_name("Out_", 12, ".txt"), "Out_12.txt");
    }
}
