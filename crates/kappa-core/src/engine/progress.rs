#[derive(Debug, Clone)]
pub enum Progress {
    /// A batch of `total` snapshots is starting.
    BatchStart { total: u64 },
    SnapshotStart { source: String },
    /// A snapshot finished; `cid_normalized` is `None` when it failed.
    SnapshotFinish {
        source: String,
        cid_normalized: Option<f64>,
    },
    BatchFinish { succeeded: usize, failed: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
