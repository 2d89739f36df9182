mod tests {
    use ledchain_conductor::color::{BLACK, parse_hex, rgb_from_u32};
    use ledchain_conductor::mailbox::{Mailbox, MailboxFull};
    use ledchain_conductor::{DataPin, Error, LedChain, Rgb};

    #[test]
    fn test_chain_starts_dark_and_unbound() {
        let chain = LedChain::<3>::new().unwrap();
        assert_eq!(chain.pixels(), &[BLACK; 3]);
        assert!(!chain.is_bound());
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        assert!(matches!(LedChain::<0>::new(), Err(Error::InvalidLedCount(0))));
    }

    #[test]
    fn test_bind_once() {
        let mut chain = LedChain::<3>::new().unwrap();
        assert_eq!(chain.bind(17), Err(Error::InvalidDataPin(17)));
        assert!(!chain.is_bound());

        assert_eq!(chain.bind(2).map(DataPin::gpio), Ok(2));
        assert_eq!(chain.bind(4), Err(Error::PinAlreadyBound));
        assert_eq!(chain.pin().map(DataPin::gpio), Some(2));
    }

    #[test]
    fn test_flash_pins_are_invalid() {
        for gpio in 6..=11 {
            assert_eq!(DataPin::new(gpio), Err(Error::InvalidDataPin(gpio)));
        }
        assert!(DataPin::new(5).is_ok());
        assert!(DataPin::new(12).is_ok());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some(Rgb { r: 255, g: 128, b: 0 }));
        assert_eq!(parse_hex("00FF00"), Some(Rgb { r: 0, g: 255, b: 0 }));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(rgb_from_u32(0x01_02_03), Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_mailbox_is_fifo_and_bounded() {
        let mailbox: Mailbox<u8, 2> = Mailbox::new();
        assert_eq!(mailbox.post(1), Ok(()));
        assert_eq!(mailbox.post(2), Ok(()));
        assert_eq!(mailbox.post(3), Err(MailboxFull(3)));

        assert_eq!(mailbox.take(), Some(1));
        assert_eq!(mailbox.requeue(9), Ok(()));
        assert_eq!(mailbox.take(), Some(9));
        assert_eq!(mailbox.take(), Some(2));
        assert_eq!(mailbox.take(), None);
        assert!(mailbox.is_empty());
    }
}
