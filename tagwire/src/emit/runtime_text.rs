//! [C7] The fixed Go runtime block every generated file prefixes
//! itself with (spec §4.7): the `RandSrc` interface and the
//! `codonEncode*`/`codonDecode*`/`codonGetByteSlice` helpers the
//! emitted Encode/Decode/Rand/DeepCopy bodies call into.
//!
//! Ported from the tag-agnostic parts of `headerLogics` in
//! `examples/original_source/extra.go`, adapted to the tag-based
//! variant: `codonEncodeVarint`/`codonEncodeUvarint` now also write the
//! field tag `(field_num << 3) | wire_type` ahead of the payload
//! (spec §4.4), and the float32/float64 `RandSrc` accessors are
//! dropped (spec §9, format-variant decision — floats are rejected by
//! the classifier in this variant).

pub const RUNTIME_GO: &str = r#"type RandSrc interface {
	GetBool() bool
	GetInt() int
	GetInt8() int8
	GetInt16() int16
	GetInt32() int32
	GetInt64() int64
	GetUint() uint
	GetUint8() uint8
	GetUint16() uint16
	GetUint32() uint32
	GetUint64() uint64
	GetString(maxLen int) string
	GetBytes(maxLen int) []byte
}

func codonEncodeTag(w *[]byte, fieldNum int, wireType int) {
	codonEncodeUvarint(w, uint64(fieldNum<<3|wireType))
}

func codonEncodeBool(fieldNum int, w *[]byte, v bool) {
	codonEncodeTag(w, fieldNum, 0)
	if v {
		codonEncodeUvarint(w, 1)
	} else {
		codonEncodeUvarint(w, 0)
	}
}

func codonEncodeVarint(fieldNum int, w *[]byte, v int64) {
	codonEncodeTag(w, fieldNum, 0)
	var ux = uint64(v) << 1
	if v < 0 {
		ux = ^ux
	}
	codonEncodeUvarint(w, ux)
}

func codonEncodeUvarint(w *[]byte, v uint64) {
	for v >= 0x80 {
		*w = append(*w, byte(v)|0x80)
		v >>= 7
	}
	*w = append(*w, byte(v))
}

func codonEncodeUvarintField(fieldNum int, w *[]byte, v uint64) {
	codonEncodeTag(w, fieldNum, 0)
	codonEncodeUvarint(w, v)
}

func codonEncodeInt8(fieldNum int, w *[]byte, v int8) {
	codonEncodeTag(w, fieldNum, 0)
	*w = append(*w, byte(v))
}

func codonEncodeUint8(fieldNum int, w *[]byte, v uint8) {
	codonEncodeTag(w, fieldNum, 0)
	*w = append(*w, v)
}

func codonEncodeInt16(fieldNum int, w *[]byte, v int16) {
	codonEncodeTag(w, fieldNum, 0)
	*w = append(*w, byte(v), byte(v>>8))
}

func codonEncodeUint16(fieldNum int, w *[]byte, v uint16) {
	codonEncodeTag(w, fieldNum, 0)
	*w = append(*w, byte(v), byte(v>>8))
}

func codonEncodeByteSlice(fieldNum int, w *[]byte, v []byte) {
	codonEncodeTag(w, fieldNum, 2)
	codonEncodeUvarint(w, uint64(len(v)))
	*w = append(*w, v...)
}

func codonEncodeString(fieldNum int, w *[]byte, v string) {
	codonEncodeByteSlice(fieldNum, w, []byte(v))
}

func codonDecodeTag(bz []byte) (fieldNum int, wireType int, n int, err error) {
	raw, n, err := codonDecodeUvarint(bz)
	if err != nil {
		return 0, 0, 0, err
	}
	return int(raw >> 3), int(raw & 0x7), n, nil
}

func codonDecodeInt64(bz []byte) (v int64, n int, err error) {
	ux, n, err := codonDecodeUvarint(bz)
	if err != nil {
		return 0, 0, err
	}
	v = int64(ux >> 1)
	if ux&1 != 0 {
		v = ^v
	}
	return v, n, nil
}

func codonDecodeUvarint(bz []byte) (v uint64, n int, err error) {
	var shift uint
	for i, b := range bz {
		if shift >= 64 {
			return 0, 0, errors.New("codon: varint overflows 64 bits")
		}
		v |= (uint64(b) & 0x7F) << shift
		if b&0x80 == 0 {
			return v, i + 1, nil
		}
		shift += 7
	}
	return 0, 0, errors.New("codon: buffer too small for varint")
}

func codonDecodeInt8(bz []byte) (v int8, n int, err error) {
	if len(bz) < 1 {
		return 0, 0, errors.New("codon: buffer too small for int8")
	}
	return int8(bz[0]), 1, nil
}

func codonDecodeUint8(bz []byte) (v uint8, n int, err error) {
	if len(bz) < 1 {
		return 0, 0, errors.New("codon: buffer too small for uint8")
	}
	return bz[0], 1, nil
}

func codonDecodeInt16(bz []byte) (v int16, n int, err error) {
	if len(bz) < 2 {
		return 0, 0, errors.New("codon: buffer too small for int16")
	}
	return int16(uint16(bz[0]) | uint16(bz[1])<<8), 2, nil
}

func codonDecodeUint16(bz []byte) (v uint16, n int, err error) {
	if len(bz) < 2 {
		return 0, 0, errors.New("codon: buffer too small for uint16")
	}
	return uint16(bz[0]) | uint16(bz[1])<<8, 2, nil
}

func codonGetByteSlice(bz []byte) (v []byte, n int, err error) {
	length, n, err := codonDecodeUvarint(bz)
	if err != nil {
		return nil, 0, err
	}
	if uint64(len(bz)-n) < length {
		return nil, 0, errors.New("codon: declared length exceeds remaining buffer")
	}
	return bz[n : n+int(length)], n + int(length), nil
}

func codonGetString(bz []byte) (v string, n int, err error) {
	raw, n, err := codonGetByteSlice(bz)
	if err != nil {
		return "", 0, err
	}
	return string(raw), n, nil
}
"#;
