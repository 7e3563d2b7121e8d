// Reference model for a tree of keys in 0..capacity.
struct RefKeys {
    entries: Vec<bool>,
}

impl RefKeys {
    fn new(capacity: usize) -> RefKeys {
        RefKeys {
            entries: vec![false; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|present| **present).count()
    }

    fn contains(&self, key: i64) -> bool {
        self.entries[key as usize]
    }

    fn iter(&self) -> std::vec::IntoIter<i64> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(key, present)| if *present { Some(key as i64) } else { None })
            .collect::<Vec<i64>>()
            .into_iter()
    }

    fn add(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let added = !*entry;
        *entry = true;
        added
    }

    fn remove(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let removed = *entry;
        *entry = false;
        removed
    }
}

fn make_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}
