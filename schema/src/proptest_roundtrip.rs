use proptest::prelude::*;
use crate::{ByteBuffer, ByteBufferMut, FLOAT_SCALE};

fn written(f: impl FnOnce(&mut ByteBufferMut)) -> Vec<u8> {
    let mut bb = ByteBufferMut::new();
    f(&mut bb);
    bb.data()
}

proptest! {
    #[test]
    fn var_int_round_trip(v in any::<i32>()) {
        let bytes = written(|bb| bb.write_var_int(v));
        prop_assert!(bytes.len() <= 5);
        let mut bb = ByteBuffer::new(&bytes);
        prop_assert_eq!(bb.read_var_int().unwrap(), v);
        prop_assert_eq!(bb.remaining(), 0);
    }

    #[test]
    fn var_uint64_round_trip(v in any::<u64>()) {
        let bytes = written(|bb| bb.write_var_uint64(v));
        prop_assert!(bytes.len() <= 10);
        prop_assert_eq!(ByteBuffer::new(&bytes).read_var_uint64().unwrap(), v);
    }

    #[test]
    fn var_int64_round_trip(v in any::<i64>()) {
        let bytes = written(|bb| bb.write_var_int64(v));
        prop_assert_eq!(ByteBuffer::new(&bytes).read_var_int64().unwrap(), v);
    }

    #[test]
    fn small_magnitudes_stay_small(v in -64i32..64) {
        prop_assert_eq!(written(|bb| bb.write_var_int(v)).len(), 1);
    }

    #[test]
    fn string_round_trip(s in ".*") {
        let bytes = written(|bb| bb.write_string(&s));
        let mut bb = ByteBuffer::new(&bytes);
        prop_assert_eq!(bb.read_string().unwrap(), s.as_str());
        prop_assert_eq!(bb.remaining(), 0);
    }

    #[test]
    fn float_error_below_one_step(v in -1.0e6f64..1.0e6) {
        let bytes = written(|bb| bb.write_float(v));
        let back = ByteBuffer::new(&bytes).read_float().unwrap();
        prop_assert!((back - v).abs() < 1.0 / FLOAT_SCALE + 1e-9, "{} -> {}", v, back);
    }

    #[test]
    fn float_exact_when_scaled_value_is_integral(sixteenths in -(1i64 << 40)..(1i64 << 40)) {
        // Multiples of 1/16 times 10000 are exact integers in f64.
        let v = sixteenths as f64 / 16.0;
        let bytes = written(|bb| bb.write_float(v));
        let back = ByteBuffer::new(&bytes).read_float().unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn truncated_input_underflows(v in any::<u64>(), s in "\\PC{1,16}") {
        let bytes = written(|bb| {
            bb.write_var_uint64(v);
            bb.write_string(&s);
        });
        for cut in 0..bytes.len() {
            let mut bb = ByteBuffer::new(&bytes[..cut]);
            let result = bb.read_var_uint64().and_then(|_| bb.read_string().map(str::len));
            prop_assert!(result.unwrap_err().is_underflow());
        }
    }
}
