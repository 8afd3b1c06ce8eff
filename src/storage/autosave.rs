//! Debounced autosave
//!
//! Every snapshot handed to the saver restarts the debounce timer. Only when
//! edits pause for the whole debounce period is the latest snapshot written
//! to the store and re-scored.

use crate::error::{Result, ResumeBuilderError};
use crate::processing::ats_scorer::AtsScorer;
use crate::record::ResumeRecord;
use crate::storage::store::{save_record, KeyValueStore};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Outcome of one save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveEvent {
    pub score: u8,
    pub saved_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl SaveEvent {
    pub fn is_saved(&self) -> bool {
        self.error.is_none()
    }
}

enum Command {
    Update(Box<ResumeRecord>),
    Flush(oneshot::Sender<()>),
}

pub struct AutoSaver {
    store: Arc<dyn KeyValueStore>,
    scorer: AtsScorer,
    debounce: Duration,
}

pub struct AutoSaveHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: watch::Receiver<Option<SaveEvent>>,
    task: JoinHandle<()>,
}

impl AutoSaver {
    /// Start the saver on the current tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, debounce: Duration) -> AutoSaveHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (events_tx, events) = watch::channel(None);

        let saver = AutoSaver {
            store,
            scorer: AtsScorer::new(),
            debounce,
        };
        let task = tokio::spawn(saver.run(receiver, events_tx));

        AutoSaveHandle {
            commands,
            events,
            task,
        }
    }

    async fn run(self, mut commands: mpsc::UnboundedReceiver<Command>, events: watch::Sender<Option<SaveEvent>>) {
        let mut pending: Option<Box<ResumeRecord>> = None;
        let timer = sleep(self.debounce);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Update(record)) => {
                        pending = Some(record);
                        timer.as_mut().reset(Instant::now() + self.debounce);
                    }
                    Some(Command::Flush(ack)) => {
                        if let Some(record) = pending.take() {
                            self.persist(record, &events).await;
                        }
                        let _ = ack.send(());
                    }
                    None => {
                        if let Some(record) = pending.take() {
                            self.persist(record, &events).await;
                        }
                        debug!("Autosave stopped");
                        break;
                    }
                },
                () = &mut timer, if pending.is_some() => {
                    if let Some(record) = pending.take() {
                        self.persist(record, &events).await;
                    }
                }
            }
        }
    }

    async fn persist(&self, record: Box<ResumeRecord>, events: &watch::Sender<Option<SaveEvent>>) {
        let score = self.scorer.score(&record);
        // Store writes are blocking file IO
        let store = Arc::clone(&self.store);
        let saved = tokio::task::spawn_blocking(move || save_record(store.as_ref(), &record)).await;

        let error = match saved {
            Ok(Ok(())) => {
                debug!("Autosaved resume, score {}", score);
                None
            }
            Ok(Err(e)) => {
                warn!("Autosave failed: {}", e);
                Some(e.to_string())
            }
            Err(e) => {
                warn!("Autosave write task failed: {}", e);
                Some(e.to_string())
            }
        };

        events.send_replace(Some(SaveEvent {
            score,
            saved_at: Utc::now(),
            error,
        }));
    }
}

impl AutoSaveHandle {
    /// Queue a snapshot and restart the debounce timer.
    pub fn update(&self, record: ResumeRecord) -> Result<()> {
        self.commands
            .send(Command::Update(Box::new(record)))
            .map_err(|_| ResumeBuilderError::Storage("autosave task has stopped".to_string()))
    }

    /// Save the pending snapshot now, if any.
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Command::Flush(ack))
            .map_err(|_| ResumeBuilderError::Storage("autosave task has stopped".to_string()))?;
        done.await
            .map_err(|_| ResumeBuilderError::Storage("autosave task has stopped".to_string()))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SaveEvent>> {
        self.events.clone()
    }

    pub fn last_event(&self) -> Option<SaveEvent> {
        self.events.borrow().clone()
    }

    /// Flush anything pending and stop the task.
    pub async fn shutdown(self) -> Result<()> {
        let AutoSaveHandle { commands, task, .. } = self;
        drop(commands);
        task.await
            .map_err(|e| ResumeBuilderError::Storage(format!("autosave task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResumeField;
    use crate::storage::store::{load_record, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.inner.remove_item(key)
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ResumeBuilderError::Storage("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Remembers which thread performed the last write.
    #[derive(Default)]
    struct ThreadRecordingStore {
        inner: MemoryStore,
        writer: std::sync::Mutex<Option<std::thread::ThreadId>>,
    }

    impl KeyValueStore for ThreadRecordingStore {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            *self.writer.lock().unwrap() = Some(std::thread::current().id());
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.inner.remove_item(key)
        }
    }

    fn named(name: &str) -> ResumeRecord {
        let mut record = ResumeRecord::new();
        record.set(ResumeField::FullName, name);
        record
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_saves_last_snapshot_once() {
        let store = Arc::new(CountingStore::default());
        let handle = AutoSaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

        handle.update(named("A")).unwrap();
        sleep(Duration::from_millis(500)).await;
        handle.update(named("Ab")).unwrap();
        sleep(Duration::from_millis(500)).await;
        handle.update(named("Abc")).unwrap();
        sleep(Duration::from_millis(999)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        let saved = load_record(&store.inner).unwrap().unwrap();
        assert_eq!(saved.get(ResumeField::FullName), "Abc");

        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        let event = handle.last_event().unwrap();
        assert!(event.is_saved());
        assert_eq!(event.score, crate::processing::ats_scorer::score(&saved));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_saves_immediately() {
        let store = Arc::new(CountingStore::default());
        let handle = AutoSaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

        handle.update(named("Flushed")).unwrap();
        handle.flush().await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        // nothing pending, so the timer must not write again
        sleep(Duration::from_secs(2)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending() {
        let store = Arc::new(CountingStore::default());
        let handle = AutoSaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

        handle.update(named("Last words")).unwrap();
        handle.shutdown().await.unwrap();

        let saved = load_record(&store.inner).unwrap().unwrap();
        assert_eq!(saved.get(ResumeField::FullName), "Last words");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_writes_happen_off_the_runtime_thread() {
        let store = Arc::new(ThreadRecordingStore::default());
        let handle = AutoSaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

        handle.update(named("Off thread")).unwrap();
        handle.flush().await.unwrap();

        let writer = store.writer.lock().unwrap().unwrap();
        assert_ne!(writer, std::thread::current().id());
        assert!(handle.last_event().unwrap().is_saved());
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_is_reported() {
        let handle = AutoSaver::spawn(Arc::new(FailingStore), DEFAULT_DEBOUNCE);
        let mut events = handle.subscribe();

        handle.update(named("Nope")).unwrap();
        events.changed().await.unwrap();

        let event = events.borrow().clone().unwrap();
        assert!(!event.is_saved());
        assert!(event.error.unwrap().contains("quota exceeded"));
        handle.shutdown().await.unwrap();
    }
}
