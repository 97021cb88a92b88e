use clap::ValueEnum;
use gop_resolver::GlobalLookup;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum GlobalLookupFlag {
    VendorThenFlat,
    FlatThenVendor,
    FlatOnly,
}

impl GlobalLookupFlag {
    pub(crate) const fn as_domain(self) -> GlobalLookup {
        match self {
            GlobalLookupFlag::VendorThenFlat => GlobalLookup::VendorThenFlat,
            GlobalLookupFlag::FlatThenVendor => GlobalLookup::FlatThenVendor,
            GlobalLookupFlag::FlatOnly => GlobalLookup::FlatOnly,
        }
    }
}
