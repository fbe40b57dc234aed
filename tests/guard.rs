mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use ledgrid_engine::Semaphore;

    #[test]
    fn test_single_permit() {
        let semaphore = Semaphore::new(1);
        assert!(semaphore.try_acquire());
        assert!(!semaphore.try_acquire());
        assert_eq!(semaphore.available_permits(), 0);
        semaphore.release();
        assert_eq!(semaphore.available_permits(), 1);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let semaphore = Semaphore::new(1);
        {
            let _permit = semaphore.lock();
            assert_eq!(semaphore.available_permits(), 0);
        }
        assert_eq!(semaphore.available_permits(), 1);
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let semaphore = Arc::new(Semaphore::new(0));
        let woke = Arc::new(AtomicUsize::new(0));
        let waiter = {
            let semaphore = Arc::clone(&semaphore);
            let woke = Arc::clone(&woke);
            thread::spawn(move || {
                semaphore.acquire();
                woke.fetch_add(1, Ordering::SeqCst);
            })
        };
        thread::sleep(Duration::from_millis(20));
        assert_eq!(woke.load(Ordering::SeqCst), 0);
        semaphore.release();
        waiter.join().unwrap();
        assert_eq!(woke.load(Ordering::SeqCst), 1);
        assert_eq!(semaphore.available_permits(), 0);
    }

    #[test]
    fn test_mutual_exclusion() {
        let semaphore = Arc::new(Semaphore::new(1));
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let semaphore = Arc::clone(&semaphore);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let _permit = semaphore.lock();
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(semaphore.available_permits(), 1);
    }
}
