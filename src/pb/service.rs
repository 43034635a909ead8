#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockInfoRequest {
    #[prost(string, tag = "1")]
    pub start: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub end: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMonthRequest {
    #[prost(string, tag = "1")]
    pub year: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub month: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetYearRequest {
    #[prost(string, tag = "1")]
    pub year: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Months {
    #[prost(message, repeated, tag = "1")]
    pub months: ::prost::alloc::vec::Vec<Month>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Month {
    #[prost(string, tag = "1")]
    pub year: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub month: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub first_block: ::core::option::Option<Block>,
    #[prost(message, optional, tag = "4")]
    pub last_block: ::core::option::Option<Block>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Block {
    #[prost(uint64, tag = "1")]
    pub number: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub parent_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "4")]
    pub timestamp: ::prost::alloc::string::String,
}
