//! User types plug into the conversion registry by implementing the traits.

use arbor_key::{Family, IntFamily, StrFamily};
use arbor_store::{
    BytesToType, DedicatedStorage, Descriptor, EntryInput, EntryOutput, Endian, Mode, Storage,
    TypeToBytes,
};
use arbor_stream::{read_array, OutputStream};

#[derive(Debug, Default, Clone, PartialEq)]
struct Server {
    host: String,
    port: u16,
    tags: Vec<String>,
}

impl TypeToBytes for Server {
    type Options = ();

    const MODE: Mode = Mode::Structural;

    fn write_tree<S: Storage>(&self, target: &Descriptor<'_, S>, _: &()) {
        target.child("host").store(&self.host);
        target.child("port").set(self.port);
        target.child("tags").store(&self.tags);
    }
}

impl BytesToType for Server {
    type Options = ();

    const MODE: Mode = Mode::Structural;

    fn read_tree<S: Storage>(source: &Descriptor<'_, S>, _: &()) -> Option<Self> {
        Some(Server {
            host: source.child("host").decode()?,
            port: source.child("port").decode()?,
            tags: source.child("tags").decode()?,
        })
    }
}

/// Fixed-point value with a custom binary layout.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Celsius(f32);

impl TypeToBytes for Celsius {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        let centi = (self.0 * 100.0).round() as i32;
        output.write(&centi.to_be_bytes());
    }
}

impl BytesToType for Celsius {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        let bytes = read_array(input)?;
        Some(Celsius(i32::from_be_bytes(bytes) as f32 / 100.0))
    }
}

fn server() -> Server {
    Server {
        host: "10.0.0.1".into(),
        port: 8443,
        tags: vec!["edge".into(), "eu".into()],
    }
}

fn round_trip_in<F: Family>() {
    let storage = DedicatedStorage::<F>::new();
    let root = Descriptor::root(&storage);
    let slot = root.child("servers").index(0);

    slot.store(&server());
    assert_eq!(slot.acquire::<Server>(), server());
    assert_eq!(slot.child("port").acquire::<u16>(), 8443);
    assert_eq!(slot.child("tags").index(1).acquire::<String>(), "eu");
    assert!(!slot.exists());
    assert!(slot.has_subtree());
}

#[test]
fn structural_type_round_trips_in_string_family() {
    round_trip_in::<StrFamily>();
}

#[test]
fn structural_type_round_trips_in_integer_family() {
    round_trip_in::<IntFamily>();
}

#[test]
fn structural_keys_are_readable_paths() {
    let storage = DedicatedStorage::<StrFamily>::new();
    Descriptor::root(&storage).child("srv").store(&server());
    let keys: Vec<String> = storage.keys().iter().map(ToString::to_string).collect();
    assert_eq!(
        keys,
        vec!["srv/host", "srv/port", "srv/tags", "srv/tags/0", "srv/tags/1"]
    );
}

#[test]
fn missing_field_reads_as_default() {
    let storage = DedicatedStorage::<StrFamily>::new();
    let d = Descriptor::root(&storage).child("partial");
    d.child("host").store("only-host");
    // Port is created empty on read and fails to decode.
    assert_eq!(d.acquire::<Server>(), Server::default());
    assert!(d.try_acquire::<Server>().is_err());
}

#[test]
fn custom_binary_layout() {
    let storage = DedicatedStorage::<IntFamily>::new();
    let d = Descriptor::root(&storage).child("temp");
    d.set(Celsius(21.5));
    assert_eq!(d.read_bytes(), 2150i32.to_be_bytes());
    assert_eq!(d.acquire::<Celsius>(), Celsius(21.5));
}

#[test]
fn endian_option_is_the_extra_argument() {
    let storage = DedicatedStorage::<StrFamily>::new();
    let d = Descriptor::root(&storage).child("word");
    d.store_with(&0xABCDu16, &Endian::Big);
    assert_eq!(d.read_bytes(), [0xAB, 0xCD]);
    assert_eq!(d.acquire_with::<u16>(&Endian::Big), 0xABCD);
    assert_eq!(d.acquire::<u16>(), 0xCDAB);
}
