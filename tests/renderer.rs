mod common;

mod tests {
    use core::cell::RefCell;

    use embassy_time::Duration;
    use ledchain_conductor::{Controller, Error, LedChain, RenderGate, Renderer, Rgb, SharedChain};

    use crate::common::{RecordingDriver, Shared, ms};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    fn bound_chain<const N: usize>() -> SharedChain<N> {
        let mut chain = LedChain::new().unwrap();
        chain.bind(2).unwrap();
        RefCell::new(chain)
    }

    #[test]
    fn test_pushes_at_most_once_per_interval() {
        let chain = bound_chain::<4>();
        let driver = RefCell::new(RecordingDriver::default());
        let mut renderer = Renderer::new(&chain, Shared(&driver), 100).unwrap();
        assert_eq!(renderer.interval(), Duration::from_millis(10));

        let mut pushed_at = Vec::new();
        for t in [0, 4, 9, 11, 21] {
            if renderer.render(ms(t)).unwrap() {
                pushed_at.push(t);
            }
        }

        assert_eq!(pushed_at, vec![0, 11, 21]);
        assert_eq!(renderer.frames_pushed(), 3);
        assert_eq!(driver.borrow().frames.len(), 3);
    }

    #[test]
    fn test_push_uses_buffer_at_call_time() {
        let chain = bound_chain::<3>();
        let driver = RefCell::new(RecordingDriver::default());
        let mut renderer = Renderer::new(&chain, Shared(&driver), 100).unwrap();

        chain.borrow_mut().pixels_mut().fill(RED);
        renderer.tick(ms(0)).unwrap();

        // Inside the cooldown: the change must not reach the strip
        chain.borrow_mut().pixels_mut().fill(BLUE);
        renderer.tick(ms(5)).unwrap();
        assert_eq!(driver.borrow().frames, vec![vec![RED; 3]]);

        renderer.tick(ms(10)).unwrap();
        assert_eq!(driver.borrow().frames, vec![vec![RED; 3], vec![BLUE; 3]]);
    }

    #[test]
    fn test_cooldown_does_not_touch_buffer() {
        let chain = bound_chain::<2>();
        let driver = RefCell::new(RecordingDriver::default());
        let mut renderer = Renderer::new(&chain, Shared(&driver), 50).unwrap();

        chain.borrow_mut().pixels_mut().fill(RED);
        renderer.tick(ms(0)).unwrap();
        renderer.tick(ms(1)).unwrap();

        assert_eq!(chain.borrow().pixels(), &[RED, RED]);
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        let chain = bound_chain::<1>();
        let result = Renderer::new(&chain, RecordingDriver::default(), 0);
        assert!(matches!(result, Err(Error::InvalidUpdateRate(0))));
        assert_eq!(RenderGate::new(2_000_000).err(), Some(Error::InvalidUpdateRate(2_000_000)));
    }

    #[test]
    fn test_driver_failure_disables_renderer_only() {
        let chain = bound_chain::<2>();
        let driver = RefCell::new(RecordingDriver::default());
        let mut renderer = Renderer::new(&chain, Shared(&driver), 100).unwrap();

        renderer.tick(ms(0)).unwrap();
        driver.borrow_mut().fail = true;
        assert_eq!(renderer.tick(ms(10)), Ok(()));
        assert!(renderer.is_faulted());

        driver.borrow_mut().fail = false;
        renderer.tick(ms(20)).unwrap();
        renderer.tick(ms(30)).unwrap();
        assert_eq!(renderer.frames_pushed(), 1);
        assert_eq!(driver.borrow().frames.len(), 1);
    }

    #[test]
    fn test_setup_requires_bound_chain() {
        let chain: SharedChain<2> = RefCell::new(LedChain::new().unwrap());
        let mut renderer = Renderer::new(&chain, RecordingDriver::default(), 100).unwrap();
        assert_eq!(renderer.setup(ms(0)), Err(Error::PinNotBound));

        chain.borrow_mut().bind(4).unwrap();
        assert_eq!(renderer.setup(ms(0)), Ok(()));
    }

    #[test]
    fn test_busy_buffer_is_reported() {
        let chain = bound_chain::<2>();
        let mut renderer = Renderer::new(&chain, RecordingDriver::default(), 100).unwrap();

        let _writer = chain.borrow_mut();
        assert_eq!(renderer.tick(ms(0)), Err(Error::BufferBusy));
    }

    #[test]
    fn test_gate_timing() {
        let mut gate = RenderGate::new(100).unwrap();
        assert!(gate.is_due(ms(0)));
        assert_eq!(gate.remaining(ms(0)), Duration::from_ticks(0));

        gate.mark_pushed(ms(100));
        assert!(!gate.is_due(ms(109)));
        assert!(!gate.is_due(ms(50)));
        assert!(gate.is_due(ms(110)));
        assert_eq!(gate.remaining(ms(104)), Duration::from_millis(6));
        assert_eq!(gate.last_push(), Some(ms(100)));

        gate.reset();
        assert!(gate.is_due(ms(101)));
    }
}
